//! HTTP plumbing shared by every role: health route and listener startup.

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Liveness endpoint exposed by every role.
pub const ENDPOINT_HEALTH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub role: String,
    pub shard: Option<usize>,
}

/// Body of non-success responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Router answering `GET /health` with the role served behind it.
pub fn health_router(role: &str, shard: Option<usize>) -> Router {
    let health = HealthResponse {
        role: role.to_string(),
        shard,
    };
    Router::new().route(
        ENDPOINT_HEALTH,
        get(move || {
            let health = health.clone();
            async move { Json(health) }
        }),
    )
}

/// Binds `addr` and serves `app` until the process stops.
pub async fn serve(addr: SocketAddr, app: Router, role: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("{} listening on {}", role, listener.local_addr()?);
    axum::serve(listener, app).await
}
