//! Signal handling and graceful shutdown.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ApiState;
use crate::config::SHUTDOWN_GRACE_PERIOD;
use crate::status_server::StatusState;

/// Cancels `shutdown` on Ctrl-C or, on Unix, SIGTERM.
pub async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl-C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
        _ = shutdown.cancelled() => return,
    }
    shutdown.cancel();
}

async fn join_server(name: &str, task: JoinHandle<anyhow::Result<()>>) {
    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, task).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => log::error!("{} server failed: {:#}", name, e),
        Ok(Err(e)) => log::error!("{} server task panicked: {}", name, e),
        Err(_) => log::warn!(
            "{} server did not stop within {:?}",
            name,
            SHUTDOWN_GRACE_PERIOD
        ),
    }
}

/// Stops the service in dependency order.
///
/// 1. Report not ready and stop the API so no new offers arrive
/// 2. Close the saver, which flushes its buffer
/// 3. Close the producer, which publishes queued events
/// 4. Stop the status server
pub async fn shutdown_gracefully(
    api: &ApiState,
    status: &StatusState,
    api_server: Option<JoinHandle<anyhow::Result<()>>>,
    status_server: JoinHandle<anyhow::Result<()>>,
    status_shutdown: CancellationToken,
) {
    status.set_ready(false);
    if let Some(api_server) = api_server {
        join_server("API", api_server).await;
    }

    let buffered = api.saver.buffered_len();
    if buffered > 0 {
        log::info!("Flushing {} buffered offers", buffered);
    }
    api.saver.close().await;
    api.producer.close().await;

    status_shutdown.cancel();
    join_server("Status", status_server).await;
}
