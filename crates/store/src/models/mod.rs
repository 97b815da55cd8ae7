//! Request payloads, response projections, and record shaping per entity.
//!
//! Inputs arrive loosely typed from the admin UI (numbers as strings, list
//! fields as delimited text). Each entity's input type turns itself into the
//! store's column layout; `*_display` decorators add the flat-text views the
//! UI edits.

pub mod account;
pub mod festival;
pub mod location;
pub mod object;
pub mod objective;
pub mod transaction;

use serde_json::Value;
use voyage_core::transform::EMPTY_ARRAY;
use voyage_core::types::Record;

/// Parse a loosely typed number, `0` on failure.
pub(crate) fn parse_float(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// Parse a loosely typed integer, truncating fractions.
pub(crate) fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64),
        _ => None,
    }
}

/// Whether a JSON value is empty in the sense of "not provided".
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// A field copied as-is, or `0` when blank.
pub(crate) fn or_zero(value: Option<&Value>) -> Value {
    match value {
        Some(v) if !is_blank(v) => v.clone(),
        _ => Value::from(0),
    }
}

/// Builds the store columns for a create (every column, with defaults) or an
/// update (only the provided columns).
pub(crate) struct Shaper {
    record: Record,
    fill_defaults: bool,
}

impl Shaper {
    pub(crate) fn create() -> Self {
        Self {
            record: Record::new(),
            fill_defaults: true,
        }
    }

    pub(crate) fn update() -> Self {
        Self {
            record: Record::new(),
            fill_defaults: false,
        }
    }

    fn put(mut self, key: &str, value: Option<Value>, default: impl FnOnce() -> Value) -> Self {
        match value {
            Some(v) => {
                self.record.insert(key.to_string(), v);
            }
            None if self.fill_defaults => {
                self.record.insert(key.to_string(), default());
            }
            None => {}
        }
        self
    }

    /// Plain text; `""` by default.
    pub(crate) fn text(self, key: &str, value: Option<String>) -> Self {
        self.put(key, value.map(Value::String), || Value::from(""))
    }

    /// Trimmed text; `""` by default.
    pub(crate) fn trimmed(self, key: &str, value: Option<String>) -> Self {
        self.text(key, value.map(|v| v.trim().to_string()))
    }

    /// Delimited text encoded as a JSON array string; `"[]"` by default.
    pub(crate) fn encoded(self, key: &str, value: Option<String>, encode: fn(&str) -> String) -> Self {
        self.put(key, value.map(|v| Value::String(encode(&v))), || {
            Value::from(EMPTY_ARRAY)
        })
    }

    /// Float parsed from text or number; `0` on failure or by default.
    pub(crate) fn float(self, key: &str, value: Option<Value>) -> Self {
        self.put(key, value.map(|v| Value::from(parse_float(&v))), || Value::from(0.0))
    }

    /// Integer parsed from text or number; `default` when zero, unparsable,
    /// or absent.
    pub(crate) fn int_or(self, key: &str, value: Option<Value>, default: i64) -> Self {
        let parsed = value.map(|v| {
            let n = parse_int(&v).filter(|n| *n != 0).unwrap_or(default);
            Value::from(n)
        });
        self.put(key, parsed, || Value::from(default))
    }

    /// Any value, `0` when blank.
    pub(crate) fn number(self, key: &str, value: Option<Value>) -> Self {
        self.put(key, value.map(|v| or_zero(Some(&v))), || Value::from(0))
    }

    /// A flag that is `true` unless explicitly `false`.
    pub(crate) fn flag(self, key: &str, value: Option<Value>) -> Self {
        let flag = value.map(|v| Value::Bool(v != Value::Bool(false)));
        self.put(key, flag, || Value::Bool(true))
    }

    /// A fixed value, written on create only.
    pub(crate) fn on_create(mut self, key: &str, value: Value) -> Self {
        if self.fill_defaults {
            self.record.insert(key.to_string(), value);
        }
        self
    }

    pub(crate) fn finish(self) -> Record {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use voyage_core::transform::comma_to_array;

    #[test]
    fn create_fills_defaults_and_update_skips_absent() {
        let build = |shaper: Shaper| {
            shaper
                .text("description", None)
                .encoded("types", None, comma_to_array)
                .float("lat", None)
                .flag("marker", None)
                .on_create("reviews", json!("[]"))
                .finish()
        };
        assert_eq!(
            Value::Object(build(Shaper::create())),
            json!({ "description": "", "types": "[]", "lat": 0.0, "marker": true, "reviews": "[]" })
        );
        assert!(build(Shaper::update()).is_empty());
    }

    #[test]
    fn coercions() {
        assert_eq!(parse_float(&json!("16.05")), 16.05);
        assert_eq!(parse_float(&json!("north")), 0.0);
        assert_eq!(parse_int(&json!("3.7")), Some(3));
        assert_eq!(parse_int(&json!(2)), Some(2));
        assert_eq!(parse_int(&json!(null)), None);
        assert_eq!(or_zero(Some(&json!(""))), json!(0));
        assert_eq!(or_zero(Some(&json!(120))), json!(120));
    }

    #[test]
    fn flag_is_true_unless_false() {
        let shaped = |v: Value| Shaper::update().flag("marker", Some(v)).finish()["marker"].clone();
        assert_eq!(shaped(json!(false)), json!(false));
        assert_eq!(shaped(json!(true)), json!(true));
        assert_eq!(shaped(json!("false")), json!(true));
    }

    #[test]
    fn int_or_replaces_zero_with_default() {
        let shaped = |v: Value| Shaper::update().int_or("price_level", Some(v), 1).finish()["price_level"].clone();
        assert_eq!(shaped(json!("3")), json!(3));
        assert_eq!(shaped(json!(0)), json!(1));
        assert_eq!(shaped(json!("cheap")), json!(1));
    }
}
