mod app;
mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use crate::{
    app::AppState,
    config::Config,
    services::SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    let store = SqliteStore::connect(&config.database)
        .await
        .context("Failed to open database")?;

    tokio::fs::create_dir_all(&config.upload.image_dir)
        .await
        .with_context(|| format!("Failed to create image directory {}", config.upload.image_dir))?;

    let state = AppState::new(&config, store);
    let app = app::router(state, &config);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Server running on {}", address);
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
