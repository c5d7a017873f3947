//! meeple server binary
//!
//! Loads `.env`, initializes tracing, and starts the HTTP server. All
//! configuration is env-first with command-line overrides.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meeple_server::{serve, ServerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "meeple-server",
    author,
    version,
    about = "REST API for the meeple board-game review platform"
)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 9090)]
    port: u16,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Load the sample data set after migrations (development only)
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; deployments set the environment directly
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("meeple_server=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        database_url: cli.database_url.unwrap_or(defaults.database_url),
        seed: cli.seed,
    };

    serve(config).await
}
