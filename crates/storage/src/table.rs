//! Key-value table storage addressed by (partition, row) pairs.
//!
//! Records are typed on the way in and out; implementations store them as
//! JSON documents. Every write stamps a fresh opaque [`Etag`]; conditional
//! updates carry the token back via [`Precondition::IfMatch`] and fail with
//! [`StorageError::PreconditionFailed`] on a lost update.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::StorageError;

/// Opaque per-record concurrency token.
///
/// Returned on every read and write; required by conditional updates to
/// detect lost updates. The contents carry no meaning beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Etag(String);

impl Etag {
    /// Stamp a fresh token. Called by stores on every successful write.
    #[must_use]
    pub fn stamp() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A record paired with the concurrency token from the read that produced it.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub record: T,
    pub etag: Etag,
}

impl<T> Versioned<T> {
    /// Split into the record, discarding the token.
    pub fn into_record(self) -> T {
        self.record
    }
}

/// Update precondition.
#[derive(Debug, Clone)]
pub enum Precondition {
    /// Last-writer-wins: overwrite whatever is stored.
    Any,
    /// Only apply if the stored token still matches.
    IfMatch(Etag),
}

/// A record that can live in a table store.
///
/// The partition key is a fixed category label shared by all records of a
/// type; the row key uniquely identifies the instance within it.
pub trait TableRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Fixed partition label for this record type.
    fn partition_key(&self) -> &'static str;

    /// Unique row key for this record.
    fn row_key(&self) -> String;
}

/// Typed key-value table storage.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch a single record by (partition, row) key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record exists at the key,
    /// or [`StorageError::Serialization`] if the stored document does not
    /// decode as `T`.
    async fn get<T: TableRecord>(
        &self,
        table: &str,
        partition: &str,
        row: &str,
    ) -> Result<Versioned<T>, StorageError>;

    /// Fetch every record in a partition. Callers filter further.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if a stored document does
    /// not decode as `T`.
    async fn query<T: TableRecord>(
        &self,
        table: &str,
        partition: &str,
    ) -> Result<Vec<T>, StorageError>;

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if the (partition, row) key
    /// is taken.
    async fn insert<T: TableRecord>(&self, table: &str, record: &T)
    -> Result<Etag, StorageError>;

    /// Overwrite an existing record, subject to the precondition.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record exists at the key,
    /// or [`StorageError::PreconditionFailed`] if an `IfMatch` token no
    /// longer matches the stored one.
    async fn update<T: TableRecord>(
        &self,
        table: &str,
        record: &T,
        precondition: Precondition,
    ) -> Result<Etag, StorageError>;

    /// Delete a record by (partition, row) key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record exists at the key.
    async fn delete(&self, table: &str, partition: &str, row: &str) -> Result<(), StorageError>;
}
