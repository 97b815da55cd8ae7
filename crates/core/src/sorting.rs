//! Multi-key comparison chains for in-memory sorting.

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::SortOrder;
use crate::types::{record_id, Record};

type KeyComparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// An ordered list of ascending comparators, consulted until one differs.
///
/// The direction is applied to the whole chain, so every tie-breaker runs in
/// the same direction as the primary key. End the chain with a unique key to
/// make the order total.
pub struct TieBreakChain<T> {
    keys: Vec<KeyComparator<T>>,
}

impl<T> Default for TieBreakChain<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> TieBreakChain<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comparator.
    pub fn then(mut self, compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        self.keys.push(Box::new(compare));
        self
    }

    /// Compare two items under the chain, ascending.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.keys
            .iter()
            .map(|key| key(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Sort in place in the given direction.
    pub fn sort(&self, items: &mut [T], order: SortOrder) {
        match order {
            SortOrder::Asc => items.sort_by(|a, b| self.compare(a, b)),
            SortOrder::Desc => items.sort_by(|a, b| self.compare(b, a)),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Numeric value of a record field, treating absent or non-numeric as `0`.
pub fn numeric_field(record: &Record, field: &str) -> f64 {
    match record.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Ascending comparison of a numeric record field.
pub fn by_numeric_field(field: &'static str) -> impl Fn(&Record, &Record) -> Ordering + Send + Sync {
    move |a, b| numeric_field(a, field).total_cmp(&numeric_field(b, field))
}

/// Ascending comparison of record ids. Records without an id sort first.
pub fn by_record_id(a: &Record, b: &Record) -> Ordering {
    record_id(a).cmp(&record_id(b))
}
