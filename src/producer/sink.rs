//! Destinations for serialized event messages.

use async_trait::async_trait;

use crate::error_handling::ProducerError;

/// A serialized message addressed to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub topic: String,
    pub key: String,
    pub payload: String,
}

/// Where the producer delivers messages.
///
/// A publish that returns an error is retried by the producer with backoff.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn publish(&self, envelope: &Envelope) -> Result<(), ProducerError>;
}

/// Sink that writes every message to the log at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl MessageSink for LogSink {
    async fn publish(&self, envelope: &Envelope) -> Result<(), ProducerError> {
        log::info!(
            "Message published to {} (key {}): {}",
            envelope.topic,
            envelope.key,
            envelope.payload
        );
        Ok(())
    }
}
