//! Data access for the hosted record store.
//!
//! - [`client`] -- the [`RecordClient`](client::RecordClient): CRUD against a
//!   logical table, with retry and backoff.
//! - [`transport`] -- the HTTP seam, with a reqwest-backed implementation.
//! - `memory` -- an in-memory transport for tests, behind the `test-util`
//!   feature.
//! - [`pagination`] -- native and virtual-field sort strategies.
//! - [`repositories`] -- per-entity readers and writers built on the client.

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod retry;
pub mod transport;

pub use client::{ListOptions, RecordClient};
pub use config::{StoreConfig, TableMap};
pub use error::StoreError;
