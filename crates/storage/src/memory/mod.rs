//! In-memory reference implementations of the storage traits.
//!
//! Each store is a cheaply cloneable handle over shared state, so the
//! server, the workflow and the test suites can all observe the same
//! writes. These back the dev server and every test; a deployment against
//! real cloud storage swaps in its own implementations of the traits.

mod blob;
mod files;
mod queue;
mod table;

pub use blob::MemoryBlobStore;
pub use files::MemoryFileStore;
pub use queue::MemoryQueueStore;
pub use table::MemoryTableStore;
