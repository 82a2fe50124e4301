//! Rowscope Server - REST API for browsing CSV datasets

mod api;
mod config;
mod state;

use std::sync::Arc;

use anyhow::Context;
use rowscope_connectors::source_from_config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::from_env()?;
    let source = source_from_config(&config.data_dir, config.base_url.as_deref())
        .context("Invalid ROWSCOPE_BASE_URL")?;
    info!("Serving datasets from {}", source.describe());

    match source.catalog().await {
        Ok(catalog) => info!("Found {} datasets", catalog.len()),
        Err(e) => tracing::warn!("Dataset catalog unavailable at startup: {}", e),
    }

    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(source, config));

    let app = api::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    info!("Starting rowscope server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
