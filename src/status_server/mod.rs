//! HTTP status server for monitoring the service.
//!
//! Provides four endpoints:
//! - `/live` - liveness probe
//! - `/ready` - readiness probe, 503 until startup has completed
//! - `/version` - build information as JSON
//! - `/metrics` - Prometheus-compatible metrics
//!
//! The server runs in the background next to the offer API.

mod handlers;
mod types;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use handlers::{live_handler, metrics_handler, ready_handler, version_handler};
pub use types::{StatusState, VersionInfo};

/// Routes of the status server.
pub fn status_router(state: StatusState) -> Router {
    Router::new()
        .route("/live", get(live_handler))
        .route("/ready", get(ready_handler))
        .route("/version", get(version_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Serves the status endpoints on `listener` until `shutdown` is cancelled.
pub async fn start_status_server(
    listener: TcpListener,
    state: StatusState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Status server listening on http://{}/", addr);
        log::info!("  - Metrics: http://{}/metrics", addr);
        log::info!("  - Version: http://{}/version", addr);
    }

    axum::serve(listener, status_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))?;

    log::debug!("Status server stopped");
    Ok(())
}
