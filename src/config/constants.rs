//! Configuration constants.
//!
//! Defaults for the CLI options and limits enforced by the HTTP API.

use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_STATUS_HOST: &str = "127.0.0.1";
pub const DEFAULT_STATUS_PORT: u16 = 8000;
pub const DB_PATH: &str = "./offer_api.db";

// Batch pipeline
/// Maximum number of offers the saver buffers between flushes
pub const DEFAULT_SAVER_CAPACITY: usize = 1000;
/// Number of batches a single flush is split into
pub const DEFAULT_FLUSH_GROUP_COUNT: usize = 4;
/// Period between flushes in milliseconds
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

// Event producer
pub const DEFAULT_PRODUCER_QUEUE_CAPACITY: usize = 256;
pub const DEFAULT_EVENTS_TOPIC: &str = "offer.events";
/// Publish attempts after the first failure
pub const PRODUCER_RETRY_ATTEMPTS: usize = 3;
/// Base delay of the exponential publish backoff in milliseconds
pub const PRODUCER_RETRY_BASE_MS: u64 = 10;

// API limits
/// Upper bound on `take` and on the size of a multi-create request
pub const MAX_PAGE_SIZE: u32 = 10_000;
pub const MAX_MULTI_CREATE: usize = 10_000;

/// How long to wait for in-flight HTTP requests once shutdown starts
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

pub const DEFAULT_PROJECT_NAME: &str = "offer_api";
pub const DEFAULT_ENVIRONMENT: &str = "development";
