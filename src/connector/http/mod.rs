//! axum HTTP surface: JSON endpoints for ingest, chat, delete and stats.

mod error;
mod handlers;
mod router;

pub use error::ApiError;
pub use router::build_router;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::connector::api::Container;

pub async fn serve(container: Arc<Container>, addr: SocketAddr, cors_origins: &[String]) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let local_addr = listener.local_addr()?;

    info!("Listening on http://{}", local_addr);

    let app = build_router(container, cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
