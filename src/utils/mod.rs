//! Utility functions.
//!
//! This module provides:
//! - Splitting of offer buffers into near-equal batches
//! - Timestamp helpers

mod split;

pub use split::split_into_batches;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
