//! Asynchronous offer event producer.
//!
//! Handlers hand [`Message`]s to an [`EventProducer`], which serializes them and
//! queues them for a background task. The task publishes each message to a
//! [`MessageSink`], retrying failed publishes with exponential backoff.
//!
//! In the other direction, an [`EventConsumer`] reads offer commands from a
//! [`MessageSource`] and applies them to the repository.

mod consumer;
mod message;
mod sink;
mod source;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;
use tokio_util::sync::CancellationToken;

use crate::config::{PRODUCER_RETRY_ATTEMPTS, PRODUCER_RETRY_BASE_MS};
use crate::error_handling::ProducerError;

pub use message::{Message, MessageBody, MessageType};
pub use consumer::{Command, ConsumerReport, EventConsumer};
pub use sink::{Envelope, LogSink, MessageSink};
pub use source::{ChannelSource, LinesSource, MessageSource};

fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(PRODUCER_RETRY_BASE_MS)
        .max_delay(Duration::from_secs(1))
        .take(PRODUCER_RETRY_ATTEMPTS)
}

/// Publishes offer events in the background.
pub struct EventProducer {
    topic: String,
    queue: mpsc::Sender<Envelope>,
    shutdown: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl EventProducer {
    /// Starts the background publisher.
    ///
    /// At most `capacity` messages wait in the queue; [`EventProducer::send`]
    /// waits for room beyond that.
    pub fn start(topic: impl Into<String>, capacity: usize, sink: Arc<dyn MessageSink>) -> Self {
        let (queue, pending) = mpsc::channel(capacity.max(1));
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(publish_loop(pending, sink, shutdown.clone()));

        EventProducer {
            topic: topic.into(),
            queue,
            shutdown,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Serializes `message` and queues it for publishing.
    ///
    /// # Errors
    ///
    /// - `ProducerError::Serialization` if the message cannot be encoded
    /// - `ProducerError::Closed` once [`EventProducer::close`] has been called
    pub async fn send(&self, message: Message) -> Result<(), ProducerError> {
        if self.shutdown.is_cancelled() {
            return Err(ProducerError::Closed);
        }

        let envelope = Envelope {
            topic: self.topic.clone(),
            key: self.topic.clone(),
            payload: serde_json::to_string(&message)?,
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(ProducerError::Closed),
            sent = self.queue.send(envelope) => sent.map_err(|_| ProducerError::Closed),
        }
    }

    /// Stops accepting messages and waits until the queue has been published.
    pub async fn close(&self) {
        self.shutdown.cancel();
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                log::error!("Event producer task failed: {}", e);
            }
            log::info!("Event producer closed");
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl Drop for EventProducer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn publish_loop(
    mut pending: mpsc::Receiver<Envelope>,
    sink: Arc<dyn MessageSink>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            next = pending.recv() => match next {
                Some(envelope) => publish(&sink, envelope).await,
                None => return,
            },
        }
    }

    pending.close();
    let mut drained = 0usize;
    while let Ok(envelope) = pending.try_recv() {
        publish(&sink, envelope).await;
        drained += 1;
    }
    if drained > 0 {
        log::debug!("Published {} queued messages during shutdown", drained);
    }
}

async fn publish(sink: &Arc<dyn MessageSink>, envelope: Envelope) {
    let result = Retry::spawn(retry_strategy(), || {
        let sink = Arc::clone(sink);
        let envelope = envelope.clone();
        async move {
            sink.publish(&envelope).await.map_err(|e| {
                log::warn!("Failed to publish message to {}, retrying: {}", envelope.topic, e);
                e
            })
        }
    })
    .await;

    if let Err(e) = result {
        log::error!(
            "Dropping message for {} after {} retries: {} ({})",
            envelope.topic,
            PRODUCER_RETRY_ATTEMPTS,
            e,
            envelope.payload
        );
    }
}
