//! Error type definitions.
//!
//! This module defines the error types used throughout the service, grouped by
//! the component that raises them.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error binding one of the service listeners.
    #[error("Failed to bind {name} listener to {addr}: {source}")]
    ListenerBindError {
        name: &'static str,
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// No live (non-deleted) offer with the given id.
    #[error("Offer {0} not found")]
    OfferNotFound(u64),

    /// A numeric value does not fit the SQLite integer column.
    #[error("Value {0} is out of range for storage")]
    ValueOutOfRange(u64),

    /// Pagination was requested with `take == 0`.
    #[error("Page size must be greater than zero")]
    ZeroPageSize,
}

/// Errors raised by the batch splitter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// The requested group count was zero.
    #[error("Invalid argument: group count must be greater than zero")]
    ZeroGroupCount,
}

/// Errors raised while flushing a buffer to the repository.
#[derive(Error, Debug)]
pub enum FlushError {
    /// The buffer could not be split; nothing was persisted.
    #[error("Failed to split offers into batches: {0}")]
    Split(#[from] SplitError),

    /// A batch failed to persist; it and every later batch were retained.
    #[error("Failed to persist batch of {batch_len} offers: {source}")]
    Persist {
        batch_len: usize,
        #[source]
        source: DatabaseError,
    },
}

/// Errors raised by the periodic tick source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    /// The tick period was zero.
    #[error("Notifier duration must be greater than zero")]
    InvalidDuration,

    /// `init` was called on a notifier that is running or already closed.
    #[error("Notifier is already initialized")]
    AlreadyInitialized,

    /// `close` was called on a notifier that is not running.
    #[error("Notifier is not running")]
    NotRunning,
}

/// Errors raised by the buffered saver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaverError {
    /// The saver was constructed with zero capacity.
    #[error("Saver capacity must be greater than zero")]
    ZeroCapacity,

    /// The flusher would split every flush into zero batches.
    #[error("Flush group count must be greater than zero")]
    ZeroGroupCount,

    /// `init` was called twice, or after `close`.
    #[error("Saver is already initialized")]
    AlreadyInitialized,

    /// `save` was called before `init`.
    #[error("Saver is not initialized")]
    NotInitialized,

    /// The buffer already holds `capacity` offers.
    #[error("Cannot add new offer, buffer holds {capacity} offers")]
    MaximumCapacityReached { capacity: usize },

    /// `save` was called after `close` started shutting the pipeline down.
    #[error("Saver is closed")]
    Closed,

    /// The notifier failed to start.
    #[error("Failed to start notifier: {0}")]
    Notifier(#[from] NotifierError),
}

/// Errors raised when publishing offer events.
#[derive(Error, Debug)]
pub enum ProducerError {
    /// The message could not be serialized.
    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The producer queue is closed.
    #[error("Producer is closed")]
    Closed,

    /// The sink rejected the message.
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Errors raised while consuming offer commands.
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// The message source failed to deliver the next message.
    #[error("Failed to read message: {0}")]
    Read(#[from] std::io::Error),

    /// The payload is not a valid offer command.
    #[error("Failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),

    /// The repository rejected the command.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Errors returned by the offer API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request failed validation.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Saver(#[from] SaverError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_error_wraps_split_error() {
        let err = FlushError::from(SplitError::ZeroGroupCount);
        assert!(err.to_string().contains("group count must be greater than zero"));
    }

    #[test]
    fn test_saver_error_messages() {
        assert_eq!(SaverError::NotInitialized.to_string(), "Saver is not initialized");
        assert_eq!(
            SaverError::MaximumCapacityReached { capacity: 10 }.to_string(),
            "Cannot add new offer, buffer holds 10 offers"
        );
        let wrapped = SaverError::from(NotifierError::AlreadyInitialized);
        assert!(wrapped.to_string().contains("Notifier is already initialized"));
    }

    #[test]
    fn test_api_error_is_transparent() {
        let err = ApiError::from(SaverError::Closed);
        assert_eq!(err.to_string(), "Saver is closed");
        let err = ApiError::from(DatabaseError::OfferNotFound(3));
        assert_eq!(err.to_string(), "Offer 3 not found");
    }

    #[test]
    fn test_database_error_not_found_message() {
        assert_eq!(DatabaseError::OfferNotFound(7).to_string(), "Offer 7 not found");
    }
}
