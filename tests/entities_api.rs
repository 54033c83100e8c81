//! Identifier gates, paging and error mapping shared by every resource

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;
use library_server::config::DeletePolicy;
use library_server::error::AppResult;
use library_server::models::{Category, CategoryPatch, Page, PageRequest};
use library_server::repository::{Directory, EntityRepository, Repository};

const RESOURCES: [&str; 6] = [
    "patron-accounts",
    "check-outs",
    "book-copies",
    "categories",
    "notifications",
    "wait-lists",
];

async fn create_category(app: &TestApp, name: &str) -> i64 {
    let response = post_json(app, "/api/categories", &json!({ "name": name, "description": "shelf" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn preset_identifier_is_rejected_everywhere() {
    let app = build_test_app().await;

    for resource in RESOURCES {
        let body = if resource == "patron-accounts" {
            json!({ "cardNumber": "AAAAAAAAAA" })
        } else {
            json!({ "id": 1, "name": "x" })
        };
        let response = post_json(&app, &format!("/api/{resource}"), &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{resource}");
        assert_eq!(total_count(&app, resource).await, 0, "{resource}");
    }
}

#[tokio::test]
async fn category_requires_a_name() {
    let app = build_test_app().await;

    let response = post_json(&app, "/api/categories", &json!({ "description": "no name" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem = body_json(response).await;
    assert_eq!(problem["message"], "error.validation");
    assert_eq!(problem["fieldErrors"][0]["field"], "name");
    assert_eq!(problem["fieldErrors"][0]["objectName"], "category");
    assert_eq!(total_count(&app, "categories").await, 0);

    let id = create_category(&app, "Poetry").await;
    let response = put_json(&app, &format!("/api/categories/{id}"), &json!({ "id": id })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_sets_location_and_alert() {
    let app = build_test_app().await;

    let response = post_json(&app, "/api/categories", &json!({ "name": "Drama" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = {
        let location = header(&response, "location").to_string();
        assert_eq!(header(&response, "x-libraryapp-alert"), "libraryApp.category.created");
        location.rsplit('/').next().unwrap().to_string()
    };
    assert_eq!(header(&response, "x-libraryapp-params"), id);
    assert_eq!(body_json(response).await["id"].to_string(), id);
}

#[tokio::test]
async fn update_gates() {
    let app = build_test_app().await;
    let id = create_category(&app, "Poetry").await;
    let uri = format!("/api/categories/{id}");

    let response = put_json(&app, &uri, &json!({ "name": "Verse" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "x-libraryapp-error"), "error.idnull");

    let response = put_json(&app, &uri, &json!({ "id": id + 1, "name": "Verse" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "x-libraryapp-error"), "error.idinvalid");

    let response = put_json(&app, "/api/categories/999", &json!({ "id": 999, "name": "Verse" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "x-libraryapp-error"), "error.idnotfound");

    let response = put_json(&app, &uri, &json!({ "id": id, "name": "Verse" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Verse");
    assert!(updated.get("description").map_or(true, |d| d.is_null()));
}

#[tokio::test]
async fn patch_gates_and_merge() {
    let app = build_test_app().await;
    let id = create_category(&app, "Poetry").await;
    let uri = format!("/api/categories/{id}");

    let response = patch_json(&app, &uri, &json!({ "description": "verse" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json(&app, &uri, &json!({ "id": id + 7, "description": "verse" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json(&app, "/api/categories/404", &json!({ "id": 404 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Only description is present; name is kept
    let response = patch_json(&app, &uri, &json!({ "id": id, "description": "verse", "name": null })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let merged = body_json(response).await;
    assert_eq!(merged["name"], "Poetry");
    assert_eq!(merged["description"], "verse");

    // Plain JSON is accepted as well
    let response = send_json(
        &app,
        Method::PATCH,
        &uri,
        "application/json",
        &json!({ "id": id, "name": "Odes" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["description"], "verse");
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = build_test_app().await;

    let response = get(&app, "/api/categories/12345").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], 404);

    let response = get(&app, "/api/categories/not-a-number").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_removes_exactly_one() {
    let app = build_test_app().await;
    let first = create_category(&app, "A").await;
    create_category(&app, "B").await;

    let response = delete(&app, &format!("/api/categories/{first}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(header(&response, "x-libraryapp-alert"), "libraryApp.category.deleted");
    assert_eq!(total_count(&app, "categories").await, 1);

    // Idempotent by default
    let response = delete(&app, &format!("/api/categories/{first}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(total_count(&app, "categories").await, 1);
}

#[tokio::test]
async fn strict_policy_reports_missing_deletes() {
    let app = build_test_app_with(test_config(DeletePolicy::Strict)).await;
    let id = create_category(&app, "A").await;

    let response = delete(&app, &format!("/api/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(&app, &format!("/api/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_methods_are_405() {
    let app = build_test_app().await;

    let response = put_json(&app, "/api/wait-lists", &json!({ "id": 1 })).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header(&response, "content-type"), "application/problem+json");

    let response = send_json(&app, Method::POST, "/api/categories/1", "application/json", &json!({})).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn paging_headers_follow_page_math() {
    let app = build_test_app().await;
    for name in ["a", "b", "c", "d", "e"] {
        create_category(&app, name).await;
    }

    let response = get(&app, "/api/categories?sort=name,desc&page=1&size=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-total-count"), "5");
    assert_eq!(
        header(&response, "link"),
        "</api/categories?sort=name,desc&page=2&size=2>; rel=\"next\",\
         </api/categories?sort=name,desc&page=0&size=2>; rel=\"prev\",\
         </api/categories?sort=name,desc&page=2&size=2>; rel=\"last\",\
         </api/categories?sort=name,desc&page=0&size=2>; rel=\"first\""
    );

    let names: Vec<_> = body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["c", "b"]);

    // size=0 selects the default page size
    let all = body_json(get(&app, "/api/categories?size=0").await).await;
    assert_eq!(all.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn page_index_out_of_range() {
    let app = build_test_app().await;
    create_category(&app, "a").await;

    let response = get(&app, "/api/categories?page=18446744073709551615").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "content-type"), "application/problem+json");

    let response = get(&app, "/api/categories?page=last").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);

    let response = get(&app, "/api/categories?page=1000&size=5").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-total-count"), "1");
    let link = header(&response, "link").to_string();
    assert!(!link.contains("rel=\"next\""));
    assert!(link.contains("</api/categories?page=999&size=5>; rel=\"prev\""));
    assert_eq!(body_json(response).await, json!([]));
}

/// Category gateway whose record disappears between the existence check
/// and the merge
struct VanishingCategories;

#[async_trait]
impl EntityRepository<Category> for VanishingCategories {
    async fn insert(&self, entity: Category) -> AppResult<Category> {
        Ok(entity)
    }

    async fn update(&self, _entity: Category) -> AppResult<Option<Category>> {
        Ok(None)
    }

    async fn merge(&self, _id: &i64, _patch: CategoryPatch) -> AppResult<Option<Category>> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &i64, _eager: bool) -> AppResult<Option<Category>> {
        Ok(None)
    }

    async fn find_page(&self, request: &PageRequest, _eager: bool) -> AppResult<Page<Category>> {
        Ok(Page {
            content: Vec::new(),
            number: request.page,
            size: request.size,
            total_elements: 0,
        })
    }

    async fn exists(&self, _id: &i64) -> AppResult<bool> {
        Ok(true)
    }

    async fn delete(&self, _id: &i64) -> AppResult<bool> {
        Ok(false)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(0)
    }
}

#[tokio::test]
async fn patch_of_vanished_record_is_not_found() {
    let directory = Arc::new(Directory::default());
    let mut repository = Repository::in_memory_with(directory.clone());
    repository.categories = Arc::new(VanishingCategories);
    let app = build_test_app_from(directory, repository, test_config(DeletePolicy::Idempotent)).await;

    let response = patch_json(&app, "/api/categories/7", &json!({ "id": 7, "name": "Gone" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], 404);
}

#[tokio::test]
async fn unknown_sort_field_is_bad_request() {
    let app = build_test_app().await;
    let response = get(&app, "/api/categories?sort=shelf,asc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_out_round() {
    let app = build_test_app().await;

    let response = post_json(
        &app,
        "/api/check-outs",
        &json!({
            "startTime": "2024-01-01T09:00:00Z",
            "status": "PENDING",
            "isReturned": false,
            "bookCopy": { "id": 3 }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = patch_json(
        &app,
        &format!("/api/check-outs/{id}"),
        &json!({ "id": id, "status": "REFUSED" }),
    )
    .await;
    let merged = body_json(response).await;
    assert_eq!(merged["status"], "REFUSED");
    assert_eq!(merged["isReturned"], false);
    assert_eq!(merged["startTime"], "2024-01-01T09:00:00Z");
    assert_eq!(merged["bookCopy"]["id"], 3);

    let response = post_json(&app, "/api/check-outs", &json!({ "status": "LOST" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn book_copy_eager_labels() {
    let app = build_test_app().await;

    let response = post_json(
        &app,
        "/api/book-copies",
        &json!({
            "yearPublished": 1965,
            "amount": 2,
            "book": { "id": 1 },
            "publisher": { "id": 1 }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let lazy = body_json(get(&app, "/api/book-copies?eagerload=false").await).await;
    assert_eq!(lazy[0]["publisher"], json!({ "id": 1 }));

    let eager = body_json(get(&app, "/api/book-copies?eagerload=true").await).await;
    assert_eq!(eager[0]["book"], json!({ "id": 1, "title": "Dune" }));
    assert_eq!(eager[0]["publisher"], json!({ "id": 1, "name": "Chilton Books" }));
}

#[tokio::test]
async fn notification_type_round() {
    let app = build_test_app().await;

    let response = post_json(
        &app,
        "/api/notifications",
        &json!({ "sentAt": "1970-01-01T00:00:00Z", "type": "REMINDER" }),
    )
    .await;
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["type"], "REMINDER");

    let response = patch_json(
        &app,
        &format!("/api/notifications/{id}"),
        &json!({ "id": id, "type": "OVERDUE" }),
    )
    .await;
    let merged = body_json(response).await;
    assert_eq!(merged["type"], "OVERDUE");
    assert_eq!(merged["sentAt"], "1970-01-01T00:00:00Z");
}

#[tokio::test]
async fn health_endpoints() {
    let app = build_test_app().await;

    let health = body_json(get(&app, "/health").await).await;
    assert_eq!(health["status"], "healthy");

    let response = get(&app, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["storage"], "memory");
}
