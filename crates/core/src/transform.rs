//! Conversion between user-facing flat text and the store's JSON-array
//! encoding.
//!
//! The admin UI edits list fields (types, image URLs, advice lines) as plain
//! comma- or newline-delimited text, while the store keeps them as a JSON
//! array serialized into a text column. Every function here is total: bad
//! input yields the documented fallback, never an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Canonical encoding of an empty list.
pub const EMPTY_ARRAY: &str = "[]";

const COMMA_JOIN: &str = ", ";
const NEWLINE_JOIN: &str = "\n";

// ---------------------------------------------------------------------------
// Text -> encoded array
// ---------------------------------------------------------------------------

/// Split comma-separated text into a JSON array string.
///
/// Pieces are trimmed and empty pieces are dropped. Empty input yields `"[]"`.
pub fn comma_to_array(input: &str) -> String {
    split_to_array(input, ',')
}

/// Split newline-separated text into a JSON array string.
///
/// Pieces are trimmed (which also strips a trailing `\r`) and empty lines are
/// dropped. Empty input yields `"[]"`.
pub fn newline_to_array(input: &str) -> String {
    split_to_array(input, '\n')
}

fn split_to_array(input: &str, delimiter: char) -> String {
    if input.is_empty() {
        return EMPTY_ARRAY.to_string();
    }
    let items: Vec<&str> = input
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    // Serializing a Vec<&str> cannot fail.
    serde_json::to_string(&items).unwrap_or_else(|_| EMPTY_ARRAY.to_string())
}

// ---------------------------------------------------------------------------
// Encoded array -> text
// ---------------------------------------------------------------------------

/// Decode a JSON array string and join it with `", "`.
///
/// Returns `""` if the input does not parse or is not an array.
pub fn array_to_comma(encoded: &str) -> String {
    decode_and_join(encoded, COMMA_JOIN)
}

/// Decode a JSON array string and join it with newlines.
///
/// Returns `""` if the input does not parse or is not an array.
pub fn array_to_newline(encoded: &str) -> String {
    decode_and_join(encoded, NEWLINE_JOIN)
}

fn decode_and_join(encoded: &str, separator: &str) -> String {
    let source = if encoded.is_empty() { EMPTY_ARRAY } else { encoded };
    match serde_json::from_str::<Value>(source) {
        Ok(Value::Array(items)) => join_items(&items, separator),
        _ => String::new(),
    }
}

fn join_items(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

// ---------------------------------------------------------------------------
// Safe parsing
// ---------------------------------------------------------------------------

/// Parse `encoded` as JSON into `T`, or return `fallback` unchanged.
///
/// Absent or empty input, malformed JSON, and JSON of the wrong shape all
/// yield the fallback.
pub fn parse_json_safe<T: DeserializeOwned>(encoded: Option<&str>, fallback: T) -> T {
    match encoded {
        Some(s) if !s.is_empty() => serde_json::from_str(s).unwrap_or(fallback),
        _ => fallback,
    }
}

// ---------------------------------------------------------------------------
// Field-value helpers
// ---------------------------------------------------------------------------
//
// Store columns holding encoded lists usually arrive as strings, but JSON
// columns arrive already decoded. These helpers accept either.

/// Decode a list field into its elements. Anything else yields an empty list.
pub fn parse_json_array_value(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::String(s)) => parse_json_safe(Some(s.as_str()), Vec::new()),
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// [`array_to_comma`] over a raw field value.
pub fn array_to_comma_value(value: Option<&Value>) -> String {
    join_value(value, COMMA_JOIN)
}

/// [`array_to_newline`] over a raw field value.
pub fn array_to_newline_value(value: Option<&Value>) -> String {
    join_value(value, NEWLINE_JOIN)
}

fn join_value(value: Option<&Value>, separator: &str) -> String {
    match value {
        Some(Value::String(s)) => decode_and_join(s, separator),
        Some(Value::Array(items)) => join_items(items, separator),
        _ => String::new(),
    }
}
