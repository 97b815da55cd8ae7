//! Authentication primitives.
//!
//! - [`password`] -- salted SHA-256 digests and the admin credential check.
//! - [`jwt`] -- HS256 token issue and validation.

pub mod jwt;
pub mod password;
