//! Error handling.
//!
//! Error types are grouped by the concern that raises them:
//! - **Construction/state errors** from the batch pipeline (`SplitError`,
//!   `NotifierError`, `SaverError`) are returned synchronously to callers
//! - **Persistence errors** (`DatabaseError`, `FlushError`) are absorbed by the
//!   saver, which retains the affected offers for the next flush
//! - **Initialization, producer, consumer and API errors** surface at the
//!   service edge

mod types;

// Re-export public API
pub use types::{
    ApiError, ConsumerError, DatabaseError, FlushError, InitializationError, NotifierError,
    ProducerError, SaverError, SplitError,
};
