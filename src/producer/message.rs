//! Offer event messages.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Kind of change an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Created,
    Updated,
    Removed,
}

/// Payload of an offer event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageBody {
    pub id: u64,
    /// Human-readable operation, e.g. `"Created offer"`.
    pub operation: String,
    pub timestamp: DateTime<Utc>,
}

/// Event published after an offer is created, updated or removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub body: MessageBody,
}

impl Message {
    pub fn new(kind: MessageType, id: u64, timestamp: DateTime<Utc>) -> Self {
        Message {
            kind,
            body: MessageBody {
                id,
                operation: format!("{} offer", kind),
                timestamp,
            },
        }
    }

    pub fn now(kind: MessageType, id: u64) -> Self {
        Self::new(kind, id, Utc::now())
    }
}
