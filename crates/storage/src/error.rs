//! Storage error kinds shared by all four store traits.

use thiserror::Error;

/// Errors surfaced by storage operations.
///
/// Workflow code treats `NotFound` and `PreconditionFailed` as signals;
/// everything else propagates unchanged to the caller (no retries are
/// performed at this layer).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The addressed entity, blob, message queue or file does not exist.
    #[error("entity not found")]
    NotFound,

    /// An insert collided with an existing (partition, row) key.
    #[error("entity already exists")]
    AlreadyExists,

    /// A conditional update carried a stale concurrency token.
    #[error("concurrency token mismatch")]
    PreconditionFailed,

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying backend failed (connectivity, I/O).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether this error means the addressed entity is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
