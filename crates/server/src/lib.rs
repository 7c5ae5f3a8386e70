//! Storeroom server library.
//!
//! This crate provides the retail management service as a library,
//! allowing it to be tested and reused. The binary in `main.rs` wires it
//! to in-memory storage and serves the HTTP API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
