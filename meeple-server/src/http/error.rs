//! API error types with IntoResponse.
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Three families reach the client: malformed input (400), missing
//! resources (404), and ownership refusals (403). Everything else renders
//! as a generic 500 with the real error going to the log, never the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use meeple_core::ValidationError;

use crate::db::repos::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Parameter validation failed (400)
    Validation(ValidationError),

    /// A malformed value reached the storage layer (400)
    BadRequest,

    /// A well-formed lookup matched nothing (404)
    NotFound { resource: &'static str, id: String },

    /// An insert referenced a missing row (404)
    MissingReference { reference: &'static str },

    /// Attempt to create a resource that already exists (409)
    Conflict { resource: &'static str },

    /// Review body edits are owner-only (403)
    Forbidden { reason: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": e.to_string()
                }),
            ),
            Self::BadRequest => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": "Bad request"
                }),
            ),
            Self::NotFound { resource, id } => {
                tracing::debug!("{} '{}' not found", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    json!({
                        "error": "not_found",
                        "message": format!("{} not exists", resource)
                    }),
                )
            }
            Self::MissingReference { reference } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} not exists", reference)
                }),
            ),
            Self::Conflict { resource } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": format!("{} already exists", resource)
                }),
            ),
            Self::Forbidden { reason } => (
                StatusCode::FORBIDDEN,
                json!({
                    "error": "forbidden",
                    "message": reason
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return a generic message
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "Internal Server Error"
                    }),
                )
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
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::MissingReference { reference } => Self::MissingReference { reference },
            DbError::Conflict { resource } => Self::Conflict { resource },
            DbError::Malformed => Self::BadRequest,
            other => Self::Database(other),
        }
    }
}
