//! In-memory activity queue.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::queue::{ActivityEnvelope, QueueStore};

/// In-memory [`QueueStore`].
///
/// Messages are stamped into [`ActivityEnvelope`] JSON at send time and
/// peeked from the front, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueueStore {
    queues: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
}

impl MemoryQueueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages currently queued. Test observability helper.
    pub async fn len(&self, queue: &str) -> usize {
        self.queues
            .read()
            .await
            .get(queue)
            .map_or(0, VecDeque::len)
    }

    /// Whether the queue holds no messages.
    pub async fn is_empty(&self, queue: &str) -> bool {
        self.len(queue).await == 0
    }

    /// Append a raw body without the envelope, for tests exercising the
    /// malformed-message passthrough path.
    pub async fn push_raw(&self, queue: &str, body: &str) {
        let mut queues = self.queues.write().await;
        queues
            .entry(queue.to_owned())
            .or_default()
            .push_back(body.to_owned());
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn send(&self, queue: &str, message: &str) -> Result<(), StorageError> {
        let body = serde_json::to_string(&ActivityEnvelope::now(message))?;
        let mut queues = self.queues.write().await;
        queues.entry(queue.to_owned()).or_default().push_back(body);
        Ok(())
    }

    async fn peek(&self, queue: &str, max: usize) -> Result<Vec<String>, StorageError> {
        let queues = self.queues.read().await;
        Ok(queues
            .get(queue)
            .map(|q| q.iter().take(max).cloned().collect())
            .unwrap_or_default())
    }
}
