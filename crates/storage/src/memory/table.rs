//! In-memory table store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::table::{Etag, Precondition, TableRecord, TableStore, Versioned};

/// One stored row: the JSON document plus its current concurrency token.
#[derive(Debug, Clone)]
struct StoredRow {
    value: serde_json::Value,
    etag: Etag,
}

type Table = HashMap<(String, String), StoredRow>;

/// In-memory [`TableStore`] keyed by table name, then (partition, row).
///
/// Every successful write stamps a fresh [`Etag`]; `IfMatch` updates are
/// checked against the stored token under the write lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl MemoryTableStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key<T: TableRecord>(record: &T) -> (String, String) {
        (record.partition_key().to_owned(), record.row_key())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn get<T: TableRecord>(
        &self,
        table: &str,
        partition: &str,
        row: &str,
    ) -> Result<Versioned<T>, StorageError> {
        let tables = self.tables.read().await;
        let stored = tables
            .get(table)
            .and_then(|t| t.get(&(partition.to_owned(), row.to_owned())))
            .ok_or(StorageError::NotFound)?;
        let record: T = serde_json::from_value(stored.value.clone())?;
        Ok(Versioned {
            record,
            etag: stored.etag.clone(),
        })
    }

    async fn query<T: TableRecord>(
        &self,
        table: &str,
        partition: &str,
    ) -> Result<Vec<T>, StorageError> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };
        let mut records = Vec::new();
        for ((p, _), stored) in rows {
            if p == partition {
                records.push(serde_json::from_value(stored.value.clone())?);
            }
        }
        Ok(records)
    }

    async fn insert<T: TableRecord>(
        &self,
        table: &str,
        record: &T,
    ) -> Result<Etag, StorageError> {
        let value = serde_json::to_value(record)?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_owned()).or_default();
        let key = Self::key(record);
        if rows.contains_key(&key) {
            return Err(StorageError::AlreadyExists);
        }
        let etag = Etag::stamp();
        rows.insert(
            key,
            StoredRow {
                value,
                etag: etag.clone(),
            },
        );
        Ok(etag)
    }

    async fn update<T: TableRecord>(
        &self,
        table: &str,
        record: &T,
        precondition: Precondition,
    ) -> Result<Etag, StorageError> {
        let value = serde_json::to_value(record)?;
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or(StorageError::NotFound)?;
        let stored = rows
            .get_mut(&Self::key(record))
            .ok_or(StorageError::NotFound)?;
        if let Precondition::IfMatch(expected) = &precondition
            && *expected != stored.etag
        {
            return Err(StorageError::PreconditionFailed);
        }
        stored.value = value;
        stored.etag = Etag::stamp();
        Ok(stored.etag.clone())
    }

    async fn delete(&self, table: &str, partition: &str, row: &str) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or(StorageError::NotFound)?;
        rows.remove(&(partition.to_owned(), row.to_owned()))
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Widget {
        id: String,
        name: String,
    }

    impl TableRecord for Widget {
        fn partition_key(&self) -> &'static str {
            "widgets"
        }

        fn row_key(&self) -> String {
            self.id.clone()
        }
    }

    fn widget(id: &str, name: &str) -> Widget {
        Widget {
            id: id.to_owned(),
            name: name.to_owned(),
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = MemoryTableStore::new();
        let w = widget("w1", "anvil");
        store.insert("things", &w).await.expect("insert");

        let got: Versioned<Widget> = store.get("things", "widgets", "w1").await.expect("get");
        assert_eq!(got.record, w);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryTableStore::new();
        let err = store
            .get::<Widget>("things", "widgets", "nope")
            .await
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryTableStore::new();
        let w = widget("w1", "anvil");
        store.insert("things", &w).await.expect("insert");
        let err = store.insert("things", &w).await.expect_err("duplicate");
        assert!(matches!(err, StorageError::AlreadyExists));
    }

    #[tokio::test]
    async fn query_filters_by_partition() {
        let store = MemoryTableStore::new();
        store
            .insert("things", &widget("w1", "anvil"))
            .await
            .expect("insert");
        store
            .insert("things", &widget("w2", "hammer"))
            .await
            .expect("insert");

        let all: Vec<Widget> = store.query("things", "widgets").await.expect("query");
        assert_eq!(all.len(), 2);

        let none: Vec<Widget> = store.query("things", "other").await.expect("query");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn unconditional_update_overwrites() {
        let store = MemoryTableStore::new();
        let mut w = widget("w1", "anvil");
        store.insert("things", &w).await.expect("insert");

        w.name = "anvil mk2".to_owned();
        store
            .update("things", &w, Precondition::Any)
            .await
            .expect("update");

        let got: Versioned<Widget> = store.get("things", "widgets", "w1").await.expect("get");
        assert_eq!(got.record.name, "anvil mk2");
    }

    #[tokio::test]
    async fn stale_token_fails_conditional_update() {
        let store = MemoryTableStore::new();
        let mut w = widget("w1", "anvil");
        let original = store.insert("things", &w).await.expect("insert");

        // Another writer bumps the record, invalidating the token.
        w.name = "anvil mk2".to_owned();
        store
            .update("things", &w, Precondition::Any)
            .await
            .expect("update");

        w.name = "anvil mk3".to_owned();
        let err = store
            .update("things", &w, Precondition::IfMatch(original))
            .await
            .expect_err("stale token");
        assert!(matches!(err, StorageError::PreconditionFailed));

        // The stale write was not applied.
        let got: Versioned<Widget> = store.get("things", "widgets", "w1").await.expect("get");
        assert_eq!(got.record.name, "anvil mk2");
    }

    #[tokio::test]
    async fn matching_token_allows_conditional_update() {
        let store = MemoryTableStore::new();
        let mut w = widget("w1", "anvil");
        store.insert("things", &w).await.expect("insert");

        let read: Versioned<Widget> = store.get("things", "widgets", "w1").await.expect("get");
        w.name = "anvil mk2".to_owned();
        store
            .update("things", &w, Precondition::IfMatch(read.etag))
            .await
            .expect("conditional update");
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = MemoryTableStore::new();
        store
            .insert("things", &widget("w1", "anvil"))
            .await
            .expect("insert");
        store.delete("things", "widgets", "w1").await.expect("delete");
        let err = store
            .delete("things", "widgets", "w1")
            .await
            .expect_err("already gone");
        assert!(err.is_not_found());
    }
}
