//! Origins of serialized offer commands.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;

use crate::error_handling::ConsumerError;

use super::sink::Envelope;

/// Where the consumer reads messages from.
///
/// `next` must be cancel safe: the consumer races it against shutdown.
#[async_trait]
pub trait MessageSource: Send {
    /// Next message, or `None` once the source is exhausted.
    async fn next(&mut self) -> Result<Option<Envelope>, ConsumerError>;
}

/// Source fed through an in-process channel.
pub struct ChannelSource {
    receiver: mpsc::Receiver<Envelope>,
}

impl ChannelSource {
    pub fn new(receiver: mpsc::Receiver<Envelope>) -> Self {
        ChannelSource { receiver }
    }
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn next(&mut self) -> Result<Option<Envelope>, ConsumerError> {
        Ok(self.receiver.recv().await)
    }
}

/// Source reading one JSON payload per line, e.g. from stdin or a file.
///
/// Blank lines are skipped.
pub struct LinesSource<R> {
    topic: String,
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LinesSource<R> {
    pub fn new(topic: impl Into<String>, reader: R) -> Self {
        LinesSource {
            topic: topic.into(),
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MessageSource for LinesSource<R> {
    async fn next(&mut self) -> Result<Option<Envelope>, ConsumerError> {
        while let Some(line) = self.lines.next_line().await? {
            let payload = line.trim();
            if payload.is_empty() {
                continue;
            }
            return Ok(Some(Envelope {
                topic: self.topic.clone(),
                key: self.topic.clone(),
                payload: payload.to_string(),
            }));
        }
        Ok(None)
    }
}
