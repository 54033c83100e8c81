//! Error types for the library server

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::QueryRejection;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

const PROBLEM_JSON: &str = "application/problem+json";
const PROBLEM_WITH_MESSAGE: &str = "/problem/problem-with-message";
const CONSTRAINT_VIOLATION: &str = "/problem/constraint-violation";
const DEFAULT_TYPE: &str = "about:blank";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected identifier on a write (`idexists`, `idnull`, `idinvalid`, `idnotfound`)
    #[error("{message}")]
    Validation {
        entity: &'static str,
        key: &'static str,
        message: String,
    },

    #[error("Validation error on {entity}: {errors}")]
    InvalidFields {
        entity: &'static str,
        errors: ValidationErrors,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn id_exists(entity: &'static str) -> Self {
        Self::validation(entity, "idexists", format!("A new {entity} cannot already have an ID"))
    }

    pub fn id_null(entity: &'static str) -> Self {
        Self::validation(entity, "idnull", "Invalid id")
    }

    pub fn id_invalid(entity: &'static str) -> Self {
        Self::validation(entity, "idinvalid", "Invalid ID")
    }

    pub fn id_not_found(entity: &'static str) -> Self {
        Self::validation(entity, "idnotfound", "Entity not found")
    }

    fn validation(entity: &'static str, key: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            entity,
            key,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidFields { .. } | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Identifier-gate failure, picked up by the alert layer to emit
/// `X-{app}-error` headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorAlert {
    pub entity: &'static str,
    pub key: &'static str,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    pub message: String,
}

/// Problem details body (RFC 7807)
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

impl Problem {
    fn new(status: StatusCode, kind: &str, detail: String) -> Self {
        Self {
            kind: kind.to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            detail,
            message: format!("error.http.{}", status.as_u16()),
            entity_name: None,
            error_key: None,
            field_errors: Vec::new(),
        }
    }
}

fn field_errors(entity: &str, errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                object_name: entity.to_string(),
                field: field.to_string(),
                message: err.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut alert = None;

        let problem = match &self {
            AppError::Validation {
                entity,
                key,
                message,
            } => {
                alert = Some(ErrorAlert {
                    entity: *entity,
                    key: *key,
                });
                Problem {
                    message: format!("error.{key}"),
                    entity_name: Some(entity.to_string()),
                    error_key: Some(key.to_string()),
                    ..Problem::new(status, PROBLEM_WITH_MESSAGE, message.clone())
                }
            }
            AppError::InvalidFields { entity, errors } => Problem {
                message: "error.validation".to_string(),
                field_errors: field_errors(entity, errors),
                ..Problem::new(
                    status,
                    CONSTRAINT_VIOLATION,
                    "Method argument not valid".to_string(),
                )
            },
            AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                Problem::new(status, DEFAULT_TYPE, msg.clone())
            }
            AppError::MethodNotAllowed => Problem::new(
                status,
                DEFAULT_TYPE,
                "Request method is not supported for this resource".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                Problem::new(status, DEFAULT_TYPE, "Database error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                Problem::new(status, DEFAULT_TYPE, "Internal server error".to_string())
            }
        };

        let mut response = (status, Json(problem)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        if let Some(alert) = alert {
            response.extensions_mut().insert(alert);
        }
        response
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
