//! Domain logic for the travel admin backend.
//!
//! Everything here is pure: no network, no clock reads except where a
//! caller passes the reference date in. The store and API crates build on
//! these types and helpers.

pub mod error;
pub mod filter;
pub mod paging;
pub mod query;
pub mod reviews;
pub mod roles;
pub mod sorting;
pub mod stats;
pub mod transform;
pub mod types;
pub mod virtual_field;
