//! File shares for documents and contracts.

use async_trait::async_trait;

use crate::error::StorageError;

/// Share-scoped file storage keyed by file name.
///
/// Unlike [`crate::BlobStore`], file names are caller-chosen and uploads to
/// an existing name overwrite it.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` in `share` under `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the upload fails.
    async fn upload(
        &self,
        share: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError>;

    /// List file names in the share, sorted. An unknown share is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the listing fails.
    async fn list(&self, share: &str) -> Result<Vec<String>, StorageError>;

    /// Fetch a file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the file does not exist.
    async fn download(&self, share: &str, file_name: &str) -> Result<Vec<u8>, StorageError>;
}
