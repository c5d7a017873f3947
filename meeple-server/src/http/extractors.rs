//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use meeple_core::ValidationError;

use super::error::ApiError;

/// Extract a numeric review id from the path, rejecting non-numeric values
/// with the malformed-parameter family rather than axum's default rejection.
pub struct ReviewIdPath(pub i32);

impl<S> FromRequestParts<S> for ReviewIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_id_param(parts, state, "review_id").await.map(Self)
    }
}

/// Extract a numeric comment id from the path.
pub struct CommentIdPath(pub i32);

impl<S> FromRequestParts<S> for CommentIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_id_param(parts, state, "comment_id").await.map(Self)
    }
}

async fn parse_id_param<S>(
    parts: &mut Parts,
    state: &S,
    field: &'static str,
) -> Result<i32, ApiError>
where
    S: Send + Sync,
{
    let Path(raw): Path<String> = Path::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::Validation(ValidationError::Empty { field }))?;

    raw.parse::<i32>().map_err(|_| {
        ApiError::Validation(ValidationError::MalformedId { field, value: raw })
    })
}
