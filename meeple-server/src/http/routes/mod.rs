//! Route handlers, organized by resource:
//! - api: endpoint catalog
//! - health: liveness probe
//! - categories, reviews, comments, users: the resource surface

pub mod api;
pub mod categories;
pub mod comments;
pub mod health;
pub mod reviews;
pub mod users;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use meeple_core::ValidationError;

use crate::http::error::ApiError;
use crate::state::AppState;

/// Assemble the /api route tree.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(api::router())
        .merge(health::router())
        .merge(categories::router())
        .merge(reviews::router())
        .merge(comments::router())
        .merge(users::router())
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found", "message": "Not found" })),
    )
        .into_response()
}

/// Pull a required body field out of its Option, naming it on failure.
pub(crate) fn require(field: &'static str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(ValidationError::Empty { field }.into()),
        None => Err(ValidationError::MissingField { field }.into()),
    }
}

/// Parse an `inc_votes` body field: present, integral, within i32.
///
/// Taken as a raw JSON value so a type mismatch fails through the same
/// validation family as every other malformed parameter.
pub(crate) fn vote_delta(value: Option<Value>) -> Result<i32, ApiError> {
    let value = value.ok_or(ValidationError::MissingField { field: "inc_votes" })?;
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| {
            ValidationError::MalformedId {
                field: "inc_votes",
                value: value.to_string(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_distinguishes_missing_from_empty() {
        assert!(require("title", Some("Gran Bazaar".into())).is_ok());
        assert!(matches!(
            require("title", None),
            Err(ApiError::Validation(ValidationError::MissingField { field: "title" }))
        ));
        assert!(matches!(
            require("title", Some(String::new())),
            Err(ApiError::Validation(ValidationError::Empty { field: "title" }))
        ));
    }

    #[test]
    fn vote_delta_accepts_integers_only() {
        assert_eq!(vote_delta(Some(json!(3))).unwrap(), 3);
        assert_eq!(vote_delta(Some(json!(-10))).unwrap(), -10);

        for bad in [json!("cat"), json!(2.5), json!(null), json!([1])] {
            assert!(vote_delta(Some(bad)).is_err());
        }
        assert!(vote_delta(None).is_err());
    }
}
