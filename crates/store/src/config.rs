//! Immutable configuration for a [`RecordClient`](crate::RecordClient).

use std::collections::HashMap;

use crate::error::StoreError;
use crate::retry::RetryPolicy;

/// Logical table names used by this backend.
pub mod tables {
    pub const ACCOUNTS: &str = "accounts";
    pub const LOCATIONS: &str = "locations";
    pub const FESTIVALS: &str = "festivals";
    pub const ITEMS: &str = "items";
    pub const OBJECTS: &str = "objects";
    pub const TRANSACTIONS: &str = "transactions";
}

/// Mapping from logical table name to the store's opaque table id.
#[derive(Debug, Clone, Default)]
pub struct TableMap {
    ids: HashMap<String, String>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table. Later registrations of the same name win.
    pub fn with(mut self, name: impl Into<String>, table_id: impl Into<String>) -> Self {
        self.ids.insert(name.into(), table_id.into());
        self
    }

    /// Resolve a logical name, failing with [`StoreError::UnknownTable`].
    pub fn resolve(&self, name: &str) -> Result<&str, StoreError> {
        self.ids
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (name, id)| map.with(name, id))
    }
}

/// Everything a [`RecordClient`](crate::RecordClient) needs to reach the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store origin, e.g. `https://app.nocodb.com`.
    pub base_url: String,
    /// Value of the `xc-token` header.
    pub api_token: String,
    pub tables: TableMap,
    pub retry: RetryPolicy,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>, tables: TableMap) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            tables,
            retry: RetryPolicy::default(),
        }
    }
}
