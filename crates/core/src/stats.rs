//! Single-pass statistics reducers over fetched records.
//!
//! Each reducer reads a superset of rows and folds it into scalar or
//! bucketed aggregates. Inputs are never mutated.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::sorting::numeric_field;
use crate::transform::parse_json_array_value;
use crate::types::{str_field, Record};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Statuses counted as a completed payment.
const SUCCESS_STATUSES: &[&str] = &["PAID", "success", "completed"];

/// Statuses counted as awaiting payment.
const PENDING_STATUSES: &[&str] = &["pending", "PENDING"];

// ---------------------------------------------------------------------------
// Categorical buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
}

/// Count records per element of an encoded list field.
///
/// Buckets appear in first-seen order. Records whose field does not decode
/// to an array contribute nothing.
pub fn type_distribution(records: &[Record], field: &str) -> Vec<TypeCount> {
    let mut buckets: Vec<TypeCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        for item in parse_json_array_value(record.get(field)) {
            let kind = match item {
                Value::String(s) => s,
                other => other.to_string(),
            };
            match index.get(&kind) {
                Some(&i) => buckets[i].count += 1,
                None => {
                    index.insert(kind.clone(), buckets.len());
                    buckets.push(TypeCount { kind, count: 1 });
                }
            }
        }
    }
    buckets
}

/// Distinct, lowercased, sorted type names across records.
///
/// With `comma_fallback`, a field that is not valid JSON is read as
/// comma-separated text instead of being skipped.
pub fn distinct_types(records: &[Record], field: &str, comma_fallback: bool) -> Vec<String> {
    let mut types = BTreeSet::new();

    for record in records {
        match record.get(field) {
            Some(Value::String(s)) if serde_json::from_str::<Value>(s).is_err() => {
                if comma_fallback {
                    types.extend(
                        s.split(',')
                            .map(|t| t.trim().to_lowercase())
                            .filter(|t| !t.is_empty()),
                    );
                }
            }
            value => {
                types.extend(
                    parse_json_array_value(value)
                        .iter()
                        .filter_map(Value::as_str)
                        .map(|t| t.trim().to_lowercase())
                        .filter(|t| !t.is_empty()),
                );
            }
        }
    }
    types.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Time buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: String,
    pub count: usize,
}

/// Parse the date part of the timestamp formats the store emits.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_utc().date());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return Some(d);
        }
    }
    None
}

/// Count records per calendar month of a date field. Unparsable dates are
/// skipped. Always returns twelve buckets, January first.
pub fn count_by_month(records: &[Record], field: &str) -> Vec<MonthCount> {
    let mut counts = [0usize; 12];
    for date in records.iter().filter_map(|r| parse_date(str_field(r, field))) {
        counts[date.month0() as usize] += 1;
    }
    MONTH_NAMES
        .iter()
        .zip(counts)
        .map(|(&month, count)| MonthCount { month, count })
        .collect()
}

/// Count records per day over the `days` days ending on `today`, oldest
/// first. A record belongs to a day when its timestamp text starts with
/// that day's `YYYY-MM-DD`.
pub fn count_by_trailing_days(
    records: &[Record],
    field: &str,
    today: NaiveDate,
    days: u32,
) -> Vec<DayCount> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = (today - Duration::days(i64::from(offset)))
                .format("%Y-%m-%d")
                .to_string();
            let count = records
                .iter()
                .filter(|r| {
                    let created = str_field(r, field);
                    !created.is_empty() && created.starts_with(&date)
                })
                .count();
            DayCount { date, count }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_transactions: usize,
    pub total_amount: f64,
    pub successful_transactions: usize,
    pub pending_transactions: usize,
}

impl TransactionStats {
    /// Only positive amounts are summed; status matching is exact.
    pub fn collect(records: &[Record]) -> Self {
        records.iter().fold(
            Self {
                total_transactions: records.len(),
                ..Self::default()
            },
            |mut stats, tx| {
                let amount = numeric_field(tx, "amount");
                if amount > 0.0 {
                    stats.total_amount += amount;
                }
                let status = str_field(tx, "status");
                if SUCCESS_STATUSES.contains(&status) {
                    stats.successful_transactions += 1;
                } else if PENDING_STATUSES.contains(&status) {
                    stats.pending_transactions += 1;
                }
                stats
            },
        )
    }
}
