//! Braid patch server library.
//!
//! Keeps one JSON document in memory. Every `PUT /state` is streamed to all
//! subscribers of `GET /state`, over Braid 209 framing or Server-Sent Events
//! depending on what the subscriber accepts.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

use axum::{routing::get, Router};
use config::{AppState, Cli};
use handlers::{get_state, health_check, put_state};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        // Already set, ignore
    }
}

/// Router for the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/state", get(get_state).put(put_state))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::new(serde_json::json!({}), cli.heartbeat());
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    info!("=== Braid Patch Server ===");
    info!("Address: http://localhost:{}", cli.port);
    info!("Heartbeat: {:?}", cli.heartbeat());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
