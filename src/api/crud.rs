//! Generic REST resource, mounted once per entity under `/api/{resource}`
//!
//! Identifier gates run before the service is called:
//! - create: the payload must not carry an identifier (`idexists`)
//! - update and patch: the payload identifier must be present (`idnull`),
//!   match the path (`idinvalid`) and resolve to a stored record (`idnotfound`)

use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use axum_extra::extract::{Query, WithRejection};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{alerts, pagination};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookCopy, Category, CheckOut, Entity, Notification, PageRequest, PatronAccount, WaitList},
    services::{EntityService, Services},
    AppState,
};

/// Entity exposed through the REST surface
pub trait Resource: Entity {
    /// Name of the schema component describing the entity
    const SCHEMA: &'static str;
    const PATCH_SCHEMA: &'static str;

    fn service(services: &Services) -> &EntityService<Self>;
}

macro_rules! resource {
    ($entity:ty, $patch:literal, $field:ident) => {
        impl Resource for $entity {
            const SCHEMA: &'static str = stringify!($entity);
            const PATCH_SCHEMA: &'static str = $patch;

            fn service(services: &Services) -> &EntityService<Self> {
                &services.$field
            }
        }
    };
}

resource!(PatronAccount, "PatronAccountPatch", patron_accounts);
resource!(Book, "BookPatch", books);
resource!(CheckOut, "CheckOutPatch", check_outs);
resource!(BookCopy, "BookCopyPatch", book_copies);
resource!(Category, "CategoryPatch", categories);
resource!(Notification, "NotificationPatch", notifications);
resource!(WaitList, "WaitListPatch", wait_lists);

/// Query parameters of a collection read
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Zero-based page index
    pub page: Option<u64>,
    /// Page size; 0 or absent selects the configured default
    pub size: Option<u64>,
    /// `field`, `field,asc|desc` or `f1,f2,desc`; repeatable
    #[serde(default)]
    pub sort: Vec<String>,
    /// Fetch to-one relationships with their labels
    #[serde(default)]
    pub eagerload: bool,
}

fn validate_fields<E: Entity>(entity: &E) -> AppResult<()> {
    entity.validate().map_err(|errors| AppError::InvalidFields {
        entity: E::NAME,
        errors,
    })
}

/// Identifier checks run by update and patch before dispatching to the service
async fn check_identifier<E: Resource>(
    services: &Services,
    path_id: &E::Id,
    payload_id: Option<&E::Id>,
) -> AppResult<()> {
    let payload_id = payload_id.ok_or_else(|| AppError::id_null(E::NAME))?;
    if payload_id != path_id {
        return Err(AppError::id_invalid(E::NAME));
    }
    if !E::service(services).exists(path_id).await? {
        return Err(AppError::id_not_found(E::NAME));
    }
    Ok(())
}

pub async fn create<E: Resource>(
    State(state): State<AppState>,
    WithRejection(Json(entity), _): WithRejection<Json<E>, AppError>,
) -> AppResult<(StatusCode, HeaderMap, Json<E>)> {
    tracing::debug!("REST request to save {} : {:?}", E::NAME, entity);
    if entity.id().is_some() {
        return Err(AppError::id_exists(E::NAME));
    }
    validate_fields(&entity)?;

    let stored = E::service(&state.services).save(entity).await?;
    let id = stored
        .id()
        .ok_or_else(|| AppError::Internal(format!("stored {} has no identifier", E::NAME)))?;

    let mut headers = alerts::created(&state.config.api.application_name, E::NAME, id)?;
    let location = format!("/api/{}/{}", E::RESOURCE, id);
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&location)
            .map_err(|e| AppError::Internal(format!("invalid location: {e}")))?,
    );

    Ok((StatusCode::CREATED, headers, Json(stored)))
}

pub async fn update<E: Resource>(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<E::Id>, AppError>,
    WithRejection(Json(entity), _): WithRejection<Json<E>, AppError>,
) -> AppResult<(HeaderMap, Json<E>)> {
    tracing::debug!("REST request to update {} : {}, {:?}", E::NAME, id, entity);
    check_identifier::<E>(&state.services, &id, entity.id()).await?;
    validate_fields(&entity)?;

    let stored = E::service(&state.services).update(entity).await?;
    let headers = alerts::updated(&state.config.api.application_name, E::NAME, &id)?;
    Ok((headers, Json(stored)))
}

/// Accepts `application/json` and `application/merge-patch+json`
pub async fn partial_update<E: Resource>(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<E::Id>, AppError>,
    WithRejection(Json(patch), _): WithRejection<Json<E::Patch>, AppError>,
) -> AppResult<(HeaderMap, Json<E>)> {
    tracing::debug!("REST request to partially update {} : {}, {:?}", E::NAME, id, patch);
    check_identifier::<E>(&state.services, &id, E::patch_id(&patch)).await?;

    let merged = E::service(&state.services).partial_update(patch).await?;
    let headers = alerts::updated(&state.config.api.application_name, E::NAME, &id)?;
    Ok((headers, Json(merged)))
}

pub async fn list<E: Resource>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> AppResult<(HeaderMap, Json<Vec<E>>)> {
    tracing::debug!("REST request to get a page of {} : {:?}", E::NAME, params);
    let api = &state.config.api;

    let size = match params.size {
        None | Some(0) => api.default_page_size,
        Some(size) => size.min(api.max_page_size),
    };
    let sort = PageRequest::parse_sort::<E>(&params.sort)
        .map_err(|field| AppError::BadRequest(format!("Unknown sort property '{}' for {}", field, E::NAME)))?;
    let request = PageRequest::new(params.page.unwrap_or(0), size).with_sort(sort);
    if request.checked_offset().is_none() {
        return Err(AppError::BadRequest(format!(
            "Page {} of size {} is out of range",
            request.page, request.size
        )));
    }

    let page = E::service(&state.services)
        .find_all(&request, params.eagerload)
        .await?;
    let headers = pagination::headers(&uri, &page)?;

    Ok((headers, Json(page.content)))
}

pub async fn get_one<E: Resource>(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<E::Id>, AppError>,
) -> AppResult<Json<E>> {
    tracing::debug!("REST request to get {} : {}", E::NAME, id);
    let entity = E::service(&state.services).find_one(&id, true).await?;
    Ok(Json(entity))
}

pub async fn delete<E: Resource>(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<E::Id>, AppError>,
) -> AppResult<(StatusCode, HeaderMap)> {
    tracing::debug!("REST request to delete {} : {}", E::NAME, id);
    E::service(&state.services).delete(&id).await?;
    let headers = alerts::deleted(&state.config.api.application_name, E::NAME, &id)?;
    Ok((StatusCode::NO_CONTENT, headers))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Routes of one entity: `/{resource}` and `/{resource}/:id`
pub fn routes<E: Resource>() -> Router<AppState> {
    Router::new()
        .route(
            &format!("/{}", E::RESOURCE),
            get(list::<E>).post(create::<E>).fallback(method_not_allowed),
        )
        .route(
            &format!("/{}/:id", E::RESOURCE),
            get(get_one::<E>)
                .put(update::<E>)
                .patch(partial_update::<E>)
                .delete(delete::<E>)
                .fallback(method_not_allowed),
        )
}
