//! Binary blob storage for attachments (product images).

use async_trait::async_trait;

use crate::error::StorageError;

/// Container-scoped binary attachment storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` in `container` under a freshly generated blob name
    /// that keeps the extension of `file_name`, and return a retrievable
    /// URL whose final path segment is the blob name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the upload fails.
    async fn upload(
        &self,
        container: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;

    /// Delete a blob by its name within the container.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the blob does not exist.
    async fn delete(&self, container: &str, blob_name: &str) -> Result<(), StorageError>;
}

/// Extract the blob name from an upload URL (its final path segment).
///
/// Used when deleting an attachment given only the stored URL.
#[must_use]
pub fn blob_name_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}
