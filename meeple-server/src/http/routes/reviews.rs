//! Review routes.
//!
//! `GET /api/reviews` is the filter/sort/paginate endpoint. Its parameters
//! are validated in meeple-core before any storage work happens, and a
//! category filter is checked against the live category table: a missing
//! category is a missing resource (404), not a malformed parameter.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use meeple_core::{ReviewQuery, ReviewQueryParams, ValidationError};

use crate::db::repos::{CategoryRepo, NewReview, Review, ReviewPage, ReviewRepo, ReviewUpdate};
use crate::http::error::ApiError;
use crate::http::extractors::ReviewIdPath;
use crate::state::AppState;

use super::{require, vote_delta};

/// Single-review response wrapper
#[derive(Serialize)]
struct ReviewResponse {
    review: Review,
}

/// Create review request
#[derive(Deserialize)]
struct CreateReviewRequest {
    title: Option<String>,
    review_body: Option<String>,
    designer: Option<String>,
    review_img_url: Option<String>,
    category: Option<String>,
    owner: Option<String>,
}

/// Update review request: exactly one of `inc_votes` or `review_body`.
#[derive(Deserialize)]
struct UpdateReviewRequest {
    inc_votes: Option<Value>,
    review_body: Option<String>,
    username: Option<String>,
}

impl UpdateReviewRequest {
    fn into_update(self) -> Result<ReviewUpdate, ApiError> {
        match (self.inc_votes, self.review_body) {
            (Some(delta), None) => Ok(ReviewUpdate::IncrementVotes(vote_delta(Some(delta))?)),
            (None, Some(body)) => {
                if body.is_empty() {
                    return Err(ValidationError::Empty { field: "review_body" }.into());
                }
                let username = require("username", self.username)?;
                Ok(ReviewUpdate::ReplaceBody { body, username })
            }
            _ => Err(ValidationError::AmbiguousUpdate.into()),
        }
    }
}

/// GET /api/reviews - filtered, sorted, paginated listing
async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewQueryParams>,
) -> Result<Json<ReviewPage>, ApiError> {
    let query = ReviewQuery::from_params(params)?;

    if let Some(slug) = query.category.as_deref() {
        if !CategoryRepo::new(state.pool()).exists(slug).await? {
            return Err(ApiError::NotFound {
                resource: "category",
                id: slug.to_owned(),
            });
        }
    }

    let page = ReviewRepo::new(state.pool()).list(&query).await?;
    Ok(Json(page))
}

/// POST /api/reviews - create a review
async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let new = NewReview {
        title: require("title", req.title)?,
        review_body: require("review_body", req.review_body)?,
        designer: req.designer,
        review_img_url: req.review_img_url,
        category: require("category", req.category)?,
        owner: require("owner", req.owner)?,
    };

    let review = ReviewRepo::new(state.pool()).create(new).await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse { review })))
}

/// GET /api/reviews/{review_id} - fetch one review with its comment count
async fn get_review(
    State(state): State<AppState>,
    ReviewIdPath(review_id): ReviewIdPath,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = ReviewRepo::new(state.pool()).get(review_id).await?;
    Ok(Json(ReviewResponse { review }))
}

/// PATCH /api/reviews/{review_id} - vote increment or owner-restricted body
/// replacement, never both
async fn update_review(
    State(state): State<AppState>,
    ReviewIdPath(review_id): ReviewIdPath,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let update = req.into_update()?;
    let repo = ReviewRepo::new(state.pool());

    let review = match update {
        ReviewUpdate::IncrementVotes(delta) => repo.increment_votes(review_id, delta).await?,
        ReviewUpdate::ReplaceBody { body, username } => {
            let current = repo.get(review_id).await?;
            if current.owner != username {
                return Err(ApiError::Forbidden {
                    reason: format!("only '{}' may edit this review", current.owner),
                });
            }
            repo.replace_body(review_id, &body).await?
        }
    };

    Ok(Json(ReviewResponse { review }))
}

/// DELETE /api/reviews/{review_id} - comments cascade
async fn delete_review(
    State(state): State<AppState>,
    ReviewIdPath(review_id): ReviewIdPath,
) -> Result<StatusCode, ApiError> {
    ReviewRepo::new(state.pool()).delete(review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Review routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/{review_id}",
            get(get_review).patch(update_review).delete(delete_review),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        inc_votes: Option<Value>,
        review_body: Option<&str>,
        username: Option<&str>,
    ) -> UpdateReviewRequest {
        UpdateReviewRequest {
            inc_votes,
            review_body: review_body.map(str::to_owned),
            username: username.map(str::to_owned),
        }
    }

    #[test]
    fn update_accepts_exactly_one_field() {
        assert!(matches!(
            request(Some(serde_json::json!(3)), None, None).into_update(),
            Ok(ReviewUpdate::IncrementVotes(3))
        ));
        assert!(matches!(
            request(None, Some("better on reread"), Some("meeplequeen")).into_update(),
            Ok(ReviewUpdate::ReplaceBody { .. })
        ));
    }

    #[test]
    fn update_rejects_both_and_neither() {
        let err = request(None, None, None).into_update().unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::AmbiguousUpdate)
        ));

        let err = request(Some(serde_json::json!(1)), Some("x"), Some("meeplequeen"))
            .into_update()
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::AmbiguousUpdate)
        ));
    }

    #[test]
    fn body_replacement_requires_a_username() {
        let err = request(None, Some("better on reread"), None)
            .into_update()
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::MissingField { field: "username" })
        ));
    }
}
