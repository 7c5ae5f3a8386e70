//! Business services.

pub mod retail;

use thiserror::Error;

use storeroom_storage::StorageError;

pub use retail::{DashboardStats, RetailService};

/// Typed failures raised by the retail service.
///
/// Precondition violations surface as `NotFound`/`InvalidOperation`;
/// storage failures propagate unchanged (no retries at this layer).
/// Notification failures never appear here at all - they are logged and
/// discarded inside the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A workflow precondition was violated (bad ids, zero stock, wrong
    /// order status).
    #[error("{0}")]
    InvalidOperation(&'static str),

    /// Malformed input.
    #[error("{0}")]
    Validation(String),

    /// A storage call failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An uploaded file: the client-supplied name plus its contents.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Whether the upload carries any content.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
