//! offer_api library: CRUD service for offers with a buffered batch-write pipeline
//!
//! Offers can be written directly through the repository or handed to a
//! [`Saver`], which buffers them in memory and persists them in batches on a
//! timer, when the buffer fills up, and on shutdown.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use offer_api::{Flusher, Notifier, Offer, Saver, SqliteOfferRepository};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = sqlx::SqlitePool::connect("sqlite::memory:").await?;
//! offer_api::run_migrations(&pool).await?;
//! let repo = Arc::new(SqliteOfferRepository::new(pool));
//!
//! let flusher = Flusher::new(4, repo);
//! let notifier = Notifier::new(Duration::from_millis(500))?;
//! let saver = Saver::new(1000, flusher, notifier)?;
//! saver.init()?;
//!
//! saver.save(Offer::new(7, 3, 90)).await?;
//! saver.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. `Notifier::init` and `Saver::init`
//! spawn background tasks.

pub mod api;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod metrics;
pub mod models;
pub mod producer;
mod run;
pub mod status_server;
pub mod storage;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{FlushError, NotifierError, SaverError, SplitError};
pub use models::{Offer, PaginationInfo, PaginationInput};
pub use run::{run_service, run_service_until, ServiceReport};
pub use storage::batch::{FlushOutcome, Flusher, Notifier, Saver};
pub use storage::{run_migrations, OfferRepository, SqliteOfferRepository};
pub use utils::split_into_batches;
