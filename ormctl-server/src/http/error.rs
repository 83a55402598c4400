//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Bodies always carry `error` (a stable kind) and `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ormctl_core::ValidationError;
use serde_json::json;

use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Payload, path or query failed validation (422)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Some ids of a batch were not found (404)
    MissingIds { resource: &'static str, ids: Vec<i64> },

    /// Constraint conflict, e.g. a duplicate link (409)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } | Self::MissingIds { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(e) => json!({
                "error": "validation_error",
                "message": e.to_string()
            }),
            Self::NotFound { resource, id } => {
                tracing::debug!(resource, id, "not found");
                json!({
                    "error": "not_found",
                    "message": format!("{} not found", resource)
                })
            }
            Self::MissingIds { resource, ids } => json!({
                "error": "not_found",
                "message": format!("{} with ids {:?} not found", resource, ids),
                "ids": ids
            }),
            Self::Conflict { message } => json!({
                "error": "conflict",
                "message": message
            }),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conflict(detail) => {
                tracing::debug!(%detail, "constraint conflict");
                Self::Conflict {
                    message: "resource already exists".into(),
                }
            }
            _ => Self::Database(e),
        }
    }
}
