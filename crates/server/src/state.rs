//! Application state shared across handlers.

use std::sync::Arc;

use storeroom_storage::{MemoryBlobStore, MemoryFileStore, MemoryQueueStore, MemoryTableStore};

use crate::config::ServerConfig;
use crate::services::RetailService;

/// The retail service over the in-memory reference stores.
pub type Retail =
    RetailService<MemoryTableStore, MemoryBlobStore, MemoryQueueStore, MemoryFileStore>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    retail: Retail,
}

impl AppState {
    /// Create application state over fresh in-memory stores.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let retail = RetailService::new(
            MemoryTableStore::new(),
            MemoryBlobStore::new(),
            MemoryQueueStore::new(),
            MemoryFileStore::new(),
        );
        Self::with_retail(config, retail)
    }

    /// Create application state over an existing service. Used by tests
    /// that want direct handles to the underlying stores.
    #[must_use]
    pub fn with_retail(config: ServerConfig, retail: Retail) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, retail }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the retail service.
    #[must_use]
    pub fn retail(&self) -> &Retail {
        &self.inner.retail
    }
}
