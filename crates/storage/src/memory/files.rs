//! In-memory file share.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::files::FileStore;

/// In-memory [`FileStore`]. Uploads to an existing name overwrite it.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    shares: Arc<RwLock<HashMap<String, HashMap<String, Vec<u8>>>>>,
}

impl MemoryFileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn upload(
        &self,
        share: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let mut shares = self.shares.write().await;
        shares
            .entry(share.to_owned())
            .or_default()
            .insert(file_name.to_owned(), bytes);
        Ok(())
    }

    async fn list(&self, share: &str) -> Result<Vec<String>, StorageError> {
        let shares = self.shares.read().await;
        let mut names: Vec<String> = shares
            .get(share)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }

    async fn download(&self, share: &str, file_name: &str) -> Result<Vec<u8>, StorageError> {
        let shares = self.shares.read().await;
        shares
            .get(share)
            .and_then(|s| s.get(file_name))
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}
