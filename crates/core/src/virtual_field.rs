//! Values computed at read time from a record's embedded review list.
//!
//! Locations and festivals store their reviews as a JSON array in the
//! `reviews` column. The store cannot sort by anything derived from that
//! array, so the average rating and review count are computed here on every
//! read and never written back.

use serde_json::Value;

use crate::sorting::{by_numeric_field, by_record_id, TieBreakChain};
use crate::transform::parse_json_array_value;
use crate::types::Record;

/// Column holding the embedded review list.
pub const REVIEWS_FIELD: &str = "reviews";

/// Output field for the average rating.
pub const CALCULATED_RATING: &str = "calculated_rating";

/// Output field for the number of reviews.
pub const REVIEW_COUNT: &str = "review_count";

/// Sort keys that select the rating chain.
pub const RATING_SORT_KEYS: &[&str] = &["rating", CALCULATED_RATING];

/// Names of sort keys that the store cannot order by natively.
#[derive(Debug, Clone)]
pub struct VirtualFieldRegistry {
    names: Vec<&'static str>,
}

impl VirtualFieldRegistry {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            names: names.to_vec(),
        }
    }

    /// The rating keys used by locations and festivals.
    pub fn ratings() -> Self {
        Self::new(RATING_SORT_KEYS)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| *n == name)
    }
}

/// Rating of a single review: `start`, else `rating`, else `0`.
///
/// A zero or non-numeric `start` falls through to `rating`, matching how the
/// mobile app writes either key.
pub fn review_rating(review: &Value) -> f64 {
    ["start", "rating"]
        .iter()
        .filter_map(|key| review.get(*key).and_then(as_number))
        .find(|n| *n != 0.0)
        .unwrap_or(0.0)
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Round half up to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Mean review rating rounded to one decimal; `0` for an empty or
/// unparsable list.
pub fn average_rating(reviews: &[Value]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: f64 = reviews.iter().map(review_rating).sum();
    round_one_decimal(total / reviews.len() as f64)
}

/// Virtual fields of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
    pub rating: f64,
    pub count: usize,
}

impl ReviewSummary {
    /// Summarize the `reviews` column of a record.
    pub fn of(record: &Record) -> Self {
        let reviews = parse_json_array_value(record.get(REVIEWS_FIELD));
        Self {
            rating: average_rating(&reviews),
            count: reviews.len(),
        }
    }

    /// Write `calculated_rating` and `review_count` into the record.
    pub fn apply(self, record: &mut Record) {
        record.insert(CALCULATED_RATING.to_string(), Value::from(self.rating));
        record.insert(REVIEW_COUNT.to_string(), Value::from(self.count));
    }
}

/// Order by rating, then review count, then id, all in one direction.
///
/// Expects records already decorated with [`ReviewSummary::apply`].
pub fn rating_chain() -> TieBreakChain<Record> {
    TieBreakChain::new()
        .then(by_numeric_field(CALCULATED_RATING))
        .then(by_numeric_field(REVIEW_COUNT))
        .then(by_record_id)
}
