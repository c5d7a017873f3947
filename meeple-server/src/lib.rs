//! meeple-server: HTTP API for the board-game review platform
//!
//! Exposes categories, reviews, comments, and users over REST, backed by
//! PostgreSQL through sqlx. The review collection endpoint carries the
//! interesting machinery: whitelist-validated sort/order, parameterized
//! category and keyword filters, and paged results with an independent
//! total count.

pub mod db;
pub mod http;
pub mod state;

use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use http::error::ApiError;
pub use state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Load the sample data set after migrations (development only)
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9090,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/meeple".to_string()),
            seed: false,
        }
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", http::routes::api_router())
        .fallback(http::routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let pool = db::create_pool(&config.database_url).await?;

    db::migrations::run(&pool).await?;
    if config.seed {
        db::seed::run(&pool).await?;
    }

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
