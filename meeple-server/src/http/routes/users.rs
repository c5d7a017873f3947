//! User routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::repos::{User, UserRepo, UserSummary};
use crate::http::error::ApiError;
use crate::state::AppState;

use super::require;

#[derive(Serialize)]
struct UsersResponse {
    users: Vec<UserSummary>,
}

#[derive(Serialize)]
struct UserResponse {
    user: User,
}

/// Create user request
#[derive(Deserialize)]
struct CreateUserRequest {
    username: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// GET /api/users
async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = UserRepo::new(state.pool()).list().await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /api/users/{username}
async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(state.pool()).get(&username).await?;
    Ok(Json(UserResponse { user }))
}

/// POST /api/users
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = require("username", req.username)?;
    let name = require("name", req.name)?;

    let user = UserRepo::new(state.pool())
        .create(&username, &name, req.avatar_url.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// User routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{username}", get(get_user))
}
