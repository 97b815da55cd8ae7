//! Donation transactions (read-only).

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use voyage_core::types::{record_id, str_field, Record, RecordId};

use super::or_zero;

/// A transaction as returned to the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    #[serde(rename = "Id")]
    pub id: Option<RecordId>,
    pub order_code: String,
    pub username: String,
    pub full_name: String,
    pub amount: Value,
    pub description: String,
    pub status: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: Value,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: Value,
}

impl TransactionView {
    /// Project a transaction row. A missing `fullName` is looked up in
    /// `names` (username to full name), falling back to the username.
    pub fn from_record(record: &Record, names: &HashMap<String, String>) -> Self {
        let text = |field: &str| str_field(record, field).to_string();
        let raw = |field: &str| record.get(field).cloned().unwrap_or(Value::Null);

        let username = text("username");
        let full_name = Some(text("fullName"))
            .filter(|n| !n.is_empty())
            .or_else(|| names.get(&username).cloned())
            .unwrap_or_else(|| username.clone());
        let status = Some(text("status"))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "pending".to_string());

        Self {
            id: record_id(record),
            order_code: text("orderCode"),
            username,
            full_name,
            amount: or_zero(record.get("amount")),
            description: text("description"),
            status,
            created_at: raw("CreatedAt"),
            updated_at: raw("UpdatedAt"),
        }
    }
}
