//! Offer command consumer.
//!
//! Commands arrive as JSON payloads tagged with their kind:
//!
//! ```json
//! {"type": "create", "value": {"id": 0, "user_id": 1, "team_id": 2, "grade": 3}}
//! {"type": "multi_create", "value": [{"id": 0, "user_id": 1, "team_id": 2, "grade": 3}]}
//! {"type": "update", "value": {"id": 7, "user_id": 1, "team_id": 2, "grade": 4}}
//! {"type": "delete", "value": {"id": 7}}
//! ```
//!
//! Each command is applied directly through the [`OfferRepository`]. A command
//! that cannot be decoded or applied is logged and skipped.

use std::sync::Arc;

use serde::Deserialize;
use strum_macros::Display;
use tokio_util::sync::CancellationToken;

use crate::error_handling::ConsumerError;
use crate::models::Offer;
use crate::storage::OfferRepository;

use super::sink::Envelope;
use super::source::MessageSource;

/// A change to apply to the offer store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Display)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Create(Offer),
    MultiCreate(Vec<Offer>),
    Update(Offer),
    Delete { id: u64 },
}

/// Counts of what a consumer run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerReport {
    pub applied: usize,
    pub failed: usize,
}

pub struct EventConsumer {
    repo: Arc<dyn OfferRepository>,
}

impl EventConsumer {
    pub fn new(repo: Arc<dyn OfferRepository>) -> Self {
        EventConsumer { repo }
    }

    /// Decodes `envelope` and applies it to the repository.
    ///
    /// # Errors
    ///
    /// - `ConsumerError::Decode` if the payload is not a command
    /// - `ConsumerError::Database` if the repository rejects it
    pub async fn apply(&self, envelope: &Envelope) -> Result<Command, ConsumerError> {
        let command: Command = serde_json::from_str(&envelope.payload)?;

        match &command {
            Command::Create(offer) => {
                let id = self.repo.create_offer(offer).await?;
                log::debug!("Consumed create, offer {} stored", id);
            }
            Command::MultiCreate(offers) => {
                let count = self.repo.multi_create_offer(offers).await?;
                log::debug!("Consumed multi_create, {} offers stored", count);
            }
            Command::Update(offer) => self.repo.update_offer(offer).await?,
            Command::Delete { id } => self.repo.remove_offer(*id).await?,
        }
        Ok(command)
    }

    /// Applies messages from `source` until it is exhausted or `shutdown` is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ConsumerError::Read` if the source fails. Commands that fail to
    /// decode or apply are counted in the report instead.
    pub async fn run<S: MessageSource>(
        &self,
        mut source: S,
        shutdown: CancellationToken,
    ) -> Result<ConsumerReport, ConsumerError> {
        let mut report = ConsumerReport::default();

        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                next = source.next() => next?,
            };
            let Some(envelope) = next else {
                break;
            };

            match self.apply(&envelope).await {
                Ok(command) => {
                    report.applied += 1;
                    log::info!("Applied {} command from {}", command, envelope.topic);
                }
                Err(e) => {
                    report.failed += 1;
                    log::error!(
                        "Skipping message from {}: {} ({})",
                        envelope.topic,
                        e,
                        envelope.payload
                    );
                }
            }
        }

        log::info!(
            "Consumer stopped: {} applied, {} failed",
            report.applied,
            report.failed
        );
        Ok(report)
    }
}
