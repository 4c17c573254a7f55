use axum::{routing::get, Router};
use std::net::SocketAddr;
use tracing::info;

/// Router answering 200 on `/`
pub fn health_router() -> Router {
    Router::new().route("/", get(health))
}

/// Serve the health endpoint on all interfaces until the process exits
pub async fn start_health_server(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Health endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, health_router().into_make_service()).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> &'static str {
    "Whitelist bot running"
}
