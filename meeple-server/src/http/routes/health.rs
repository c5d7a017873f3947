//! Health check route

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::db::repos::DbError;
use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /api/healthz - liveness plus a storage round trip
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(DbError::from)?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Health route
pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(health_check))
}
