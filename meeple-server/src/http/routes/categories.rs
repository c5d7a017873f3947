//! Category routes

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Category, CategoryRepo};
use crate::http::error::ApiError;
use crate::state::AppState;

use super::require;

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct CategoryResponse {
    category: Category,
}

/// Create category request
#[derive(Deserialize)]
struct CreateCategoryRequest {
    slug: Option<String>,
    description: Option<String>,
}

/// GET /api/categories
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = CategoryRepo::new(state.pool()).list().await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// POST /api/categories
async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let slug = require("slug", req.slug)?;
    let description = require("description", req.description)?;

    let category = CategoryRepo::new(state.pool())
        .create(&slug, &description)
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

/// Category routes
pub fn router() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories).post(create_category))
}
