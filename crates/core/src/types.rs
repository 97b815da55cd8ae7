/// Row identifiers are integers issued by the record store. This layer never
/// generates or reuses them.
pub type RecordId = i64;

/// A store row: field name to scalar or string-encoded JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Name of the identifier column on every store table.
pub const ID_FIELD: &str = "Id";

/// Read the `Id` column of a record.
///
/// Accepts both numeric ids and numeric strings, since some store views
/// serialize ids as text.
pub fn record_id(record: &Record) -> Option<RecordId> {
    match record.get(ID_FIELD)? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a string field, treating absent and `null` as empty.
pub fn str_field<'a>(record: &'a Record, field: &str) -> &'a str {
    record
        .get(field)
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
}
