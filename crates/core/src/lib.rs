//! Storeroom Core - Shared domain types.
//!
//! This crate provides the common types used across the Storeroom
//! components:
//!
//! - `storage` - Table/blob/queue/file storage abstractions
//! - `server` - Retail management HTTP service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and
//!   order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
