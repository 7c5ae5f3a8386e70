//! Best-effort activity message queues.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Wire format of a queued activity message.
///
/// Implementations stamp the envelope at send time, so every backend yields
/// bodies of the form `{"timestamp": "...", "message": "..."}`. Consumers
/// that fail to parse a body pass it through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEnvelope {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl ActivityEnvelope {
    /// Wrap a human-readable message, stamping the current UTC time.
    #[must_use]
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}

/// Append-only message channel with bounded peek.
///
/// Delivery is best effort: callers on the workflow side discard send
/// failures after logging them.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Append a message to the named queue, wrapping it in an
    /// [`ActivityEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the queue is unavailable.
    async fn send(&self, queue: &str, message: &str) -> Result<(), StorageError>;

    /// Peek at most `max` message bodies from the front of the queue
    /// without consuming them. An unknown queue yields no messages.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the queue is unavailable.
    async fn peek(&self, queue: &str, max: usize) -> Result<Vec<String>, StorageError>;
}
