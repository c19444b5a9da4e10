//! worksafe server entry point.
//!
//! Boots the HTTP API: loads configuration, wires up the stores and
//! headless-browser fetchers, and serves the route table.

use std::sync::Arc;

use anyhow::Result;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod pipeline;
mod response;
mod routes;
mod state;

use state::AppState;
use worksafe_core::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::load()?;
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::from_config(config)?);

    let app = routes::app_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Mobile clients call from app origins; allow everything.
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "worksafe server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
