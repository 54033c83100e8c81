//! `X-{app}-alert` / `X-{app}-error` notification headers

use std::fmt::Display;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::Response,
};

use crate::{
    error::{AppError, AppResult, ErrorAlert},
    AppState,
};

fn header_name(app: &str, suffix: &str) -> AppResult<HeaderName> {
    HeaderName::from_bytes(format!("x-{app}-{suffix}").as_bytes())
        .map_err(|e| AppError::Internal(format!("invalid alert header name: {e}")))
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(format!("invalid alert header value: {e}")))
}

fn alert(app: &str, kind: &str, message: &str, param: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header_name(app, kind)?, header_value(message)?);
    headers.insert(header_name(app, "params")?, header_value(param)?);
    Ok(headers)
}

pub fn created(app: &str, entity: &str, id: &impl Display) -> AppResult<HeaderMap> {
    alert(app, "alert", &format!("{app}.{entity}.created"), &id.to_string())
}

pub fn updated(app: &str, entity: &str, id: &impl Display) -> AppResult<HeaderMap> {
    alert(app, "alert", &format!("{app}.{entity}.updated"), &id.to_string())
}

pub fn deleted(app: &str, entity: &str, id: &impl Display) -> AppResult<HeaderMap> {
    alert(app, "alert", &format!("{app}.{entity}.deleted"), &id.to_string())
}

pub fn failure(app: &str, entity: &str, key: &str) -> AppResult<HeaderMap> {
    alert(app, "error", &format!("error.{key}"), entity)
}

/// Adds error alert headers to responses produced from identifier-gate failures
pub async fn error_alert_headers(State(state): State<AppState>, mut response: Response) -> Response {
    if let Some(ErrorAlert { entity, key }) = response.extensions().get::<ErrorAlert>().copied() {
        match failure(&state.config.api.application_name, entity, key) {
            Ok(headers) => response.headers_mut().extend(headers),
            Err(e) => tracing::warn!("Could not build error alert: {}", e),
        }
    }
    response
}
