//! Application initialization.
//!
//! Logger setup and the batch pipeline assembly used by the service entry point.

mod logger;
mod pipeline;

pub use logger::init_logger_with;
pub use pipeline::init_saver;
