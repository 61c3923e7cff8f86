//! Status server HTTP handlers.

mod health;
mod metrics;

pub use health::{live_handler, ready_handler, version_handler};
pub use metrics::metrics_handler;
