//! Well-known role name constants.
//!
//! The admin panel has a single operator role; tokens issued by the login
//! endpoint always carry it.

pub const ROLE_ADMIN: &str = "admin";
