//! Storeroom Storage - Cloud-style storage abstractions.
//!
//! The retail service talks to four storage systems through the traits in
//! this crate:
//!
//! - [`TableStore`] - key-value table storage addressed by a
//!   (partition, row) pair, with per-record concurrency tokens
//! - [`BlobStore`] - binary attachments (product images) keyed by
//!   container + name, retrievable by URL
//! - [`QueueStore`] - best-effort append-only activity message channel
//! - [`FileStore`] - file shares for documents and contracts
//!
//! The [`memory`] module provides in-memory reference implementations used
//! by the server and the test suites. A production backend implements the
//! same four traits against its storage SDK.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod blob;
pub mod error;
pub mod files;
pub mod memory;
pub mod queue;
pub mod table;

pub use blob::{BlobStore, blob_name_from_url};
pub use error::StorageError;
pub use files::FileStore;
pub use memory::{MemoryBlobStore, MemoryFileStore, MemoryQueueStore, MemoryTableStore};
pub use queue::{ActivityEnvelope, QueueStore};
pub use table::{Etag, Precondition, TableRecord, TableStore, Versioned};
