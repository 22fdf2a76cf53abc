//! HTTP surface: the dashboard summary and the validated transactions as JSON.

mod error;
mod handlers;
mod router;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::DashboardService;

pub use error::ApiError;
pub use handlers::RangeQuery;
pub use router::create_router;

/// Serve the API until Ctrl-C is received.
pub async fn run_server(service: Arc<DashboardService>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port)
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    tracing::info!(
        "Serving dashboard for {} on http://{}",
        service.source_description(),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
