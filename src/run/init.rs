//! Service resource initialization.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::api::ApiState;
use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::initialization::init_saver;
use crate::metrics::ServiceMetrics;
use crate::producer::{EventProducer, LogSink};
use crate::status_server::{StatusState, VersionInfo};
use crate::storage::{init_db_pool_with_path, run_migrations, OfferRepository, SqliteOfferRepository};

/// Everything a running service holds on to.
pub struct ServiceResources {
    pub api: ApiState,
    pub status: StatusState,
    pub api_listener: TcpListener,
    pub status_listener: TcpListener,
}

async fn bind_listener(name: &'static str, addr: String) -> Result<TcpListener, InitializationError> {
    TcpListener::bind(&addr)
        .await
        .map_err(|source| InitializationError::ListenerBindError { name, addr, source })
}

/// Initializes all resources needed to serve requests.
///
/// 1. Open the SQLite database and run migrations
/// 2. Start the batch pipeline and the event producer
/// 3. Bind the API and status listeners
///
/// # Errors
///
/// Returns an error if any step fails. Pipeline tasks started before the
/// failing step are stopped when their handles are dropped.
pub async fn init_service_resources(config: &Config) -> Result<ServiceResources> {
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repo: Arc<dyn OfferRepository> = Arc::new(SqliteOfferRepository::new(pool));
    let metrics = Arc::new(ServiceMetrics::new());

    let saver = init_saver(
        config.saver_capacity,
        config.flush_group_count,
        config.flush_interval(),
        Arc::clone(&repo),
        metrics.clone(),
    )
    .context("Failed to start batch pipeline")?;

    let producer = Arc::new(EventProducer::start(
        config.events_topic.clone(),
        config.producer_queue_capacity,
        Arc::new(LogSink),
    ));

    let api_listener = bind_listener("API", config.api_addr()).await?;
    let status_listener = bind_listener("status", config.status_addr()).await?;

    let status = StatusState::new(
        metrics.clone(),
        Arc::clone(&saver),
        VersionInfo::from_config(config),
    );
    let api = ApiState {
        repo,
        saver,
        producer,
        metrics,
    };

    Ok(ServiceResources {
        api,
        status,
        api_listener,
        status_listener,
    })
}
