//! In-memory blob store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::blob::BlobStore;
use crate::error::StorageError;

/// In-memory [`BlobStore`].
///
/// Uploads get a generated name (`<uuid>.<ext>`) and a `memory://` URL
/// whose final segment is that name.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    containers: Arc<RwLock<HashMap<String, HashMap<String, Vec<u8>>>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a blob exists. Test observability helper.
    pub async fn contains(&self, container: &str, blob_name: &str) -> bool {
        self.containers
            .read()
            .await
            .get(container)
            .is_some_and(|c| c.contains_key(blob_name))
    }

    /// Number of blobs in a container. Test observability helper.
    pub async fn len(&self, container: &str) -> usize {
        self.containers
            .read()
            .await
            .get(container)
            .map_or(0, HashMap::len)
    }

    /// Whether the container holds no blobs.
    pub async fn is_empty(&self, container: &str) -> bool {
        self.len(container).await == 0
    }
}

fn generate_blob_name(file_name: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
        _ => stem,
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        container: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let blob_name = generate_blob_name(file_name);
        let mut containers = self.containers.write().await;
        containers
            .entry(container.to_owned())
            .or_default()
            .insert(blob_name.clone(), bytes);
        Ok(format!("memory://{container}/{blob_name}"))
    }

    async fn delete(&self, container: &str, blob_name: &str) -> Result<(), StorageError> {
        let mut containers = self.containers.write().await;
        containers
            .get_mut(container)
            .and_then(|c| c.remove(blob_name))
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use crate::blob::blob_name_from_url;

    use super::*;

    #[tokio::test]
    async fn upload_keeps_extension_and_url_ends_in_blob_name() {
        let store = MemoryBlobStore::new();
        let url = store
            .upload("productimages", "cover.png", vec![1, 2, 3])
            .await
            .expect("upload");

        let name = blob_name_from_url(&url).expect("blob name");
        assert!(name.ends_with(".png"));
        assert!(store.contains("productimages", name).await);
    }

    #[tokio::test]
    async fn delete_by_name_from_url() {
        let store = MemoryBlobStore::new();
        let url = store
            .upload("productimages", "cover.jpg", vec![0; 16])
            .await
            .expect("upload");

        let name = blob_name_from_url(&url).expect("blob name");
        store.delete("productimages", name).await.expect("delete");
        assert!(store.is_empty("productimages").await);

        let err = store
            .delete("productimages", name)
            .await
            .expect_err("already gone");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn uploads_of_same_file_name_do_not_collide() {
        let store = MemoryBlobStore::new();
        let a = store
            .upload("productimages", "cover.png", vec![1])
            .await
            .expect("upload");
        let b = store
            .upload("productimages", "cover.png", vec![2])
            .await
            .expect("upload");
        assert_ne!(a, b);
        assert_eq!(store.len("productimages").await, 2);
    }
}
