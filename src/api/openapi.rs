//! OpenAPI documentation
//!
//! The CRUD handlers are generic, so their paths are added to the document by
//! [`CrudPaths`] instead of `#[utoipa::path]` attributes.

use axum::Router;
use utoipa::{
    openapi::{
        path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder, PathItemType},
        request_body::RequestBodyBuilder,
        schema::ArrayBuilder,
        ContentBuilder, Ref, RefOr, Required, ResponseBuilder, Schema,
    },
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use super::{crud::Resource, health};
use crate::models::{Book, BookCopy, Category, CheckOut, Notification, PatronAccount, WaitList};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Patrons, books, checkouts, book copies, categories, notifications and wait lists",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        health::health_check,
        health::readiness_check,
    ),
    components(
        schemas(
            // Entities
            crate::models::PatronAccount,
            crate::models::PatronAccountPatch,
            crate::models::CardNumber,
            crate::models::Book,
            crate::models::BookPatch,
            crate::models::CheckOut,
            crate::models::CheckOutPatch,
            crate::models::CheckOutStatus,
            crate::models::BookCopy,
            crate::models::BookCopyPatch,
            crate::models::Category,
            crate::models::CategoryPatch,
            crate::models::Notification,
            crate::models::NotificationPatch,
            crate::models::NotificationType,
            crate::models::WaitList,
            crate::models::WaitListPatch,
            // References
            crate::models::UserRef,
            crate::models::BookRef,
            crate::models::PublisherRef,
            crate::models::BookCopyRef,
            crate::models::PatronAccountRef,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::Problem,
            crate::error::FieldError,
        )
    ),
    modifiers(&CrudPaths),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "patron-accounts", description = "Patron account management"),
        (name = "books", description = "Book management"),
        (name = "check-outs", description = "Checkout management"),
        (name = "book-copies", description = "Book copy management"),
        (name = "categories", description = "Category management"),
        (name = "notifications", description = "Notification management"),
        (name = "wait-lists", description = "Wait list management")
    )
)]
pub struct ApiDoc;

pub struct CrudPaths;

impl Modify for CrudPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        add_crud_paths::<PatronAccount>(openapi);
        add_crud_paths::<Book>(openapi);
        add_crud_paths::<CheckOut>(openapi);
        add_crud_paths::<BookCopy>(openapi);
        add_crud_paths::<Category>(openapi);
        add_crud_paths::<Notification>(openapi);
        add_crud_paths::<WaitList>(openapi);
    }
}

fn json_body(schema: impl Into<RefOr<Schema>>) -> utoipa::openapi::Content {
    ContentBuilder::new().schema(schema).build()
}

fn problem_response(description: &str) -> utoipa::openapi::Response {
    ResponseBuilder::new()
        .description(description)
        .content("application/problem+json", json_body(Ref::from_schema_name("Problem")))
        .build()
}

fn add_crud_paths<E: Resource>(openapi: &mut utoipa::openapi::OpenApi) {
    let tag = E::RESOURCE;
    let entity = || Ref::from_schema_name(E::SCHEMA);
    let id_param = || {
        ParameterBuilder::new()
            .name("id")
            .parameter_in(ParameterIn::Path)
            .required(Required::True)
            .description(Some(format!("{} identifier", E::NAME)))
            .build()
    };
    let query_param = |name: &str, description: &str| {
        ParameterBuilder::new()
            .name(name)
            .parameter_in(ParameterIn::Query)
            .required(Required::False)
            .description(Some(description))
            .build()
    };

    let list = OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(format!("list_{}", E::NAME)))
        .summary(Some(format!("Get a page of {}", E::RESOURCE)))
        .parameter(query_param("page", "Zero-based page index"))
        .parameter(query_param("size", "Page size"))
        .parameter(query_param("sort", "field,asc|desc; repeatable"))
        .parameter(query_param("eagerload", "Load to-one relationships"))
        .response(
            "200",
            ResponseBuilder::new()
                .description("Page of records, with X-Total-Count and Link headers")
                .content(
                    "application/json",
                    json_body(RefOr::T(Schema::Array(ArrayBuilder::new().items(entity()).build()))),
                )
                .build(),
        )
        .response("400", problem_response("Unknown sort property"))
        .build();

    let create = OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(format!("create_{}", E::NAME)))
        .summary(Some(format!("Create a {}", E::NAME)))
        .request_body(Some(
            RequestBodyBuilder::new()
                .content("application/json", json_body(entity()))
                .required(Some(Required::True))
                .build(),
        ))
        .response(
            "201",
            ResponseBuilder::new()
                .description("Record created")
                .content("application/json", json_body(entity()))
                .build(),
        )
        .response("400", problem_response("Identifier already set or invalid fields"))
        .build();

    let get_one = OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(format!("get_{}", E::NAME)))
        .summary(Some(format!("Get a {}", E::NAME)))
        .parameter(id_param())
        .response(
            "200",
            ResponseBuilder::new()
                .description("Record with its relationships loaded")
                .content("application/json", json_body(entity()))
                .build(),
        )
        .response("404", problem_response("Record not found"))
        .build();

    let update = OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(format!("update_{}", E::NAME)))
        .summary(Some(format!("Replace a {}", E::NAME)))
        .parameter(id_param())
        .request_body(Some(
            RequestBodyBuilder::new()
                .content("application/json", json_body(entity()))
                .required(Some(Required::True))
                .build(),
        ))
        .response(
            "200",
            ResponseBuilder::new()
                .description("Record updated")
                .content("application/json", json_body(entity()))
                .build(),
        )
        .response("400", problem_response("Missing, mismatched or unknown identifier"))
        .build();

    let patch = OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(format!("partial_update_{}", E::NAME)))
        .summary(Some(format!("Merge fields into a {}", E::NAME)))
        .parameter(id_param())
        .request_body(Some(
            RequestBodyBuilder::new()
                .content(
                    "application/merge-patch+json",
                    json_body(Ref::from_schema_name(E::PATCH_SCHEMA)),
                )
                .required(Some(Required::True))
                .build(),
        ))
        .response(
            "200",
            ResponseBuilder::new()
                .description("Record updated")
                .content("application/json", json_body(entity()))
                .build(),
        )
        .response("400", problem_response("Missing, mismatched or unknown identifier"))
        .response("404", problem_response("Record removed concurrently"))
        .build();

    let delete = OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(format!("delete_{}", E::NAME)))
        .summary(Some(format!("Delete a {}", E::NAME)))
        .parameter(id_param())
        .response("204", ResponseBuilder::new().description("Record deleted").build())
        .response("404", problem_response("Record not found (strict delete policy)"))
        .build();

    let collection = PathItemBuilder::new()
        .operation(PathItemType::Get, list)
        .operation(PathItemType::Post, create)
        .build();
    let item = PathItemBuilder::new()
        .operation(PathItemType::Get, get_one)
        .operation(PathItemType::Put, update)
        .operation(PathItemType::Patch, patch)
        .operation(PathItemType::Delete, delete)
        .build();

    openapi
        .paths
        .paths
        .insert(format!("/api/{}", E::RESOURCE), collection);
    openapi
        .paths
        .paths
        .insert(format!("/api/{}/{{id}}", E::RESOURCE), item);
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
