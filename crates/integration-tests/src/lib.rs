//! Integration test fixtures for Storeroom.
//!
//! Provides shared handles to the in-memory stores, seeding helpers, and
//! failure-injecting store wrappers used to exercise the partial-failure
//! gaps of the order workflow.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use storeroom_server::models::{Customer, NewCustomer, Product, ProductForm};
use storeroom_server::services::RetailService;
use storeroom_server::state::Retail;
use storeroom_storage::{
    Etag, MemoryBlobStore, MemoryFileStore, MemoryQueueStore, MemoryTableStore, Precondition,
    QueueStore, StorageError, TableRecord, TableStore, Versioned,
};

/// Shared handles to the four in-memory stores backing a test service.
#[derive(Clone, Default)]
pub struct TestStores {
    pub tables: MemoryTableStore,
    pub blobs: MemoryBlobStore,
    pub queue: MemoryQueueStore,
    pub files: MemoryFileStore,
}

impl TestStores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A retail service over clones of these stores; writes through the
    /// service are observable through the handles kept here.
    #[must_use]
    pub fn service(&self) -> Retail {
        RetailService::new(
            self.tables.clone(),
            self.blobs.clone(),
            self.queue.clone(),
            self.files.clone(),
        )
    }
}

/// Register a customer with valid fixture data.
///
/// # Panics
///
/// Panics if the service rejects the fixture.
pub async fn seed_customer(service: &Retail) -> Customer {
    service
        .add_customer(
            NewCustomer {
                first_name: "Grace".to_owned(),
                last_name: "Hopper".to_owned(),
                email: "grace@example.com".to_owned(),
                phone: "555 867 5309".to_owned(),
            },
            None,
        )
        .await
        .expect("seed customer")
}

/// Create a product with the given price and stock.
///
/// # Panics
///
/// Panics if the service rejects the fixture.
pub async fn seed_product(service: &Retail, price: f64, stock: i64) -> Product {
    service
        .add_product(
            ProductForm {
                name: "Anvil".to_owned(),
                description: "Drop-forged".to_owned(),
                price,
                stock_quantity: stock,
                category: "Hardware".to_owned(),
            },
            None,
        )
        .await
        .expect("seed product")
}

/// A [`TableStore`] wrapper that fails the next `update` against a chosen
/// table, for exercising the order-written/stock-not-decremented window.
#[derive(Clone)]
pub struct FailingUpdateTableStore {
    inner: MemoryTableStore,
    fail_table: String,
    armed: Arc<AtomicBool>,
}

impl FailingUpdateTableStore {
    #[must_use]
    pub fn new(inner: MemoryTableStore, fail_table: &str) -> Self {
        Self {
            inner,
            fail_table: fail_table.to_owned(),
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Arm the failure; the next matching update errors and disarms.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TableStore for FailingUpdateTableStore {
    async fn get<T: TableRecord>(
        &self,
        table: &str,
        partition: &str,
        row: &str,
    ) -> Result<Versioned<T>, StorageError> {
        self.inner.get(table, partition, row).await
    }

    async fn query<T: TableRecord>(
        &self,
        table: &str,
        partition: &str,
    ) -> Result<Vec<T>, StorageError> {
        self.inner.query(table, partition).await
    }

    async fn insert<T: TableRecord>(
        &self,
        table: &str,
        record: &T,
    ) -> Result<Etag, StorageError> {
        self.inner.insert(table, record).await
    }

    async fn update<T: TableRecord>(
        &self,
        table: &str,
        record: &T,
        precondition: Precondition,
    ) -> Result<Etag, StorageError> {
        if table == self.fail_table && self.armed.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Backend("injected update failure".to_owned()));
        }
        self.inner.update(table, record, precondition).await
    }

    async fn delete(&self, table: &str, partition: &str, row: &str) -> Result<(), StorageError> {
        self.inner.delete(table, partition, row).await
    }
}

/// A [`QueueStore`] that is permanently unavailable.
#[derive(Clone, Default)]
pub struct DownQueueStore;

#[async_trait]
impl QueueStore for DownQueueStore {
    async fn send(&self, _queue: &str, _message: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("queue unavailable".to_owned()))
    }

    async fn peek(&self, _queue: &str, _max: usize) -> Result<Vec<String>, StorageError> {
        Err(StorageError::Backend("queue unavailable".to_owned()))
    }
}
