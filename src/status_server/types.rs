//! Status server data structures.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::metrics::ServiceMetrics;
use crate::storage::batch::Saver;

/// Shared state for the status server
#[derive(Clone)]
pub struct StatusState {
    pub metrics: Arc<ServiceMetrics>,
    pub saver: Arc<Saver>,
    /// Flipped once startup has finished; `/ready` answers 503 until then
    pub ready: Arc<AtomicBool>,
    pub version: Arc<VersionInfo>,
    pub start_time: Instant,
}

impl StatusState {
    pub fn new(metrics: Arc<ServiceMetrics>, saver: Arc<Saver>, version: VersionInfo) -> Self {
        StatusState {
            metrics,
            saver,
            ready: Arc::new(AtomicBool::new(false)),
            version: Arc::new(version),
            start_time: Instant::now(),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

/// JSON response for `/version`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub debug: bool,
    pub environment: String,
    pub version: String,
    pub commit_hash: String,
}

impl VersionInfo {
    /// Build information for this binary. The commit hash comes from
    /// `GIT_COMMIT_HASH` at compile time.
    pub fn from_config(config: &Config) -> Self {
        VersionInfo {
            name: config.project_name.clone(),
            debug: config.debug,
            environment: config.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit_hash: option_env!("GIT_COMMIT_HASH")
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}
