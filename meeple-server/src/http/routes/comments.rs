//! Comment routes.
//!
//! Reads and creation hang off the parent review; mutation and deletion
//! address the comment directly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::repos::{Comment, CommentRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CommentIdPath, ReviewIdPath};
use crate::state::AppState;

use super::{require, vote_delta};

#[derive(Serialize)]
struct CommentsResponse {
    comments: Vec<Comment>,
}

#[derive(Serialize)]
struct CommentResponse {
    comment: Comment,
}

/// Create comment request
#[derive(Deserialize)]
struct CreateCommentRequest {
    username: Option<String>,
    body: Option<String>,
}

/// Patch comment request
#[derive(Deserialize)]
struct PatchCommentRequest {
    inc_votes: Option<Value>,
}

/// GET /api/reviews/{review_id}/comments
async fn list_comments(
    State(state): State<AppState>,
    ReviewIdPath(review_id): ReviewIdPath,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments = CommentRepo::new(state.pool())
        .list_for_review(review_id)
        .await?;
    Ok(Json(CommentsResponse { comments }))
}

/// POST /api/reviews/{review_id}/comments
async fn create_comment(
    State(state): State<AppState>,
    ReviewIdPath(review_id): ReviewIdPath,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let username = require("username", req.username)?;
    let body = require("body", req.body)?;

    let comment = CommentRepo::new(state.pool())
        .create(review_id, &username, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

/// PATCH /api/comments/{comment_id} - relative vote change
async fn update_comment(
    State(state): State<AppState>,
    CommentIdPath(comment_id): CommentIdPath,
    Json(req): Json<PatchCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let delta = vote_delta(req.inc_votes)?;
    let comment = CommentRepo::new(state.pool())
        .increment_votes(comment_id, delta)
        .await?;
    Ok(Json(CommentResponse { comment }))
}

/// DELETE /api/comments/{comment_id}
async fn delete_comment(
    State(state): State<AppState>,
    CommentIdPath(comment_id): CommentIdPath,
) -> Result<StatusCode, ApiError> {
    CommentRepo::new(state.pool()).delete(comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Comment routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/reviews/{review_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/comments/{comment_id}",
            patch(update_comment).delete(delete_comment),
        )
}
