//! Service entry point.
//!
//! Starts the offer API and status server on top of the batch pipeline and
//! runs until a shutdown signal arrives.

mod init;
mod shutdown;

use std::time::Instant;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::api::start_api_server;
use crate::config::Config;
use crate::status_server::start_status_server;

use init::init_service_resources;
use shutdown::{shutdown_gracefully, wait_for_signal};

/// Summary of a service run, returned after shutdown.
#[derive(Debug, Clone)]
pub struct ServiceReport {
    /// Offers created through the API
    pub created: usize,
    /// Offers persisted by the batch pipeline
    pub flushed: usize,
    /// Offers still buffered after the final flush
    pub unflushed: usize,
    pub uptime_seconds: f64,
}

/// Runs the service until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if startup fails.
pub async fn run_service(config: Config) -> Result<ServiceReport> {
    let shutdown = CancellationToken::new();
    let signals = tokio::spawn(wait_for_signal(shutdown.clone()));

    let report = run_service_until(config, shutdown).await;
    signals.abort();
    report
}

/// Runs the service until `shutdown` is cancelled, then stops it gracefully.
///
/// # Errors
///
/// Returns an error if startup fails.
pub async fn run_service_until(config: Config, shutdown: CancellationToken) -> Result<ServiceReport> {
    let start = Instant::now();
    let resources = init_service_resources(&config).await?;
    let api = resources.api;
    let status = resources.status;

    let status_shutdown = CancellationToken::new();
    let status_server = tokio::spawn(start_status_server(
        resources.status_listener,
        status.clone(),
        status_shutdown.clone(),
    ));
    let mut api_server = tokio::spawn(start_api_server(
        resources.api_listener,
        api.clone(),
        shutdown.clone(),
    ));

    status.set_ready(true);
    log::info!("Service ready");

    // The API server only exits on its own if it fails
    let api_server = tokio::select! {
        _ = shutdown.cancelled() => Some(api_server),
        result = &mut api_server => {
            match result {
                Ok(Ok(())) => log::warn!("Offer API server exited unexpectedly"),
                Ok(Err(e)) => log::error!("Offer API server failed: {:#}", e),
                Err(e) => log::error!("Offer API server task panicked: {}", e),
            }
            shutdown.cancel();
            None
        }
    };

    shutdown_gracefully(&api, &status, api_server, status_server, status_shutdown).await;

    let report = ServiceReport {
        created: api.metrics.created(),
        flushed: api.metrics.flushed_offers(),
        unflushed: api.saver.buffered_len(),
        uptime_seconds: start.elapsed().as_secs_f64(),
    };
    log::info!(
        "Service stopped after {:.1}s: {} offers created, {} flushed, {} unflushed",
        report.uptime_seconds,
        report.created,
        report.flushed,
        report.unflushed
    );
    Ok(report)
}
