//! Reviews flattened out of their parent records.
//!
//! Reviews are not a table of their own: each location and festival embeds
//! its reviews as a JSON array. The admin panel lists them as one collection,
//! so each embedded entry becomes a [`MergedReview`] tagged with its parent.

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::transform::parse_json_array_value;
use crate::types::{record_id, str_field, Record, RecordId};
use crate::virtual_field::{review_rating, round_one_decimal, REVIEWS_FIELD};

/// Parent entity type of an embedded review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSource {
    Location,
    Festival,
}

impl ReviewSource {
    /// Parse the `source` path segment (`location` or `festival`, any case).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "location" | "locations" => Ok(ReviewSource::Location),
            "festival" | "festivals" => Ok(ReviewSource::Festival),
            other => Err(CoreError::Validation(format!(
                "Unknown review source '{other}'"
            ))),
        }
    }

    /// Logical table holding the parent records.
    pub fn table(self) -> &'static str {
        match self {
            ReviewSource::Location => "locations",
            ReviewSource::Festival => "festivals",
        }
    }

    /// Display label used in the merged list.
    pub fn label(self) -> &'static str {
        match self {
            ReviewSource::Location => "Location",
            ReviewSource::Festival => "Festival",
        }
    }

    /// Entity name for not-found errors.
    pub fn entity(self) -> &'static str {
        self.label()
    }

    fn id_prefix(self) -> &'static str {
        match self {
            ReviewSource::Location => "loc",
            ReviewSource::Festival => "fest",
        }
    }
}

/// One embedded review, lifted to a top-level item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedReview {
    /// Stable `{prefix}-{sourceId}-{index}` identifier.
    pub id: String,
    pub source: &'static str,
    pub source_id: RecordId,
    pub source_name: String,
    pub user: String,
    pub rating: f64,
    pub comment: String,
    pub time_review: String,
    /// Position within the parent's review array; used for deletion.
    pub review_index: usize,
}

impl MergedReview {
    fn matches(&self, needle: &str) -> bool {
        self.user.to_lowercase().contains(needle)
            || self.source_name.to_lowercase().contains(needle)
            || self.comment.to_lowercase().contains(needle)
    }
}

/// Restriction of the merged collection to a single parent record.
///
/// Selecting a location excludes every festival and vice versa; selecting
/// both excludes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewScope {
    pub location_id: Option<String>,
    pub festival_id: Option<String>,
}

impl ReviewScope {
    /// Build a scope from raw filter values; blank values mean "any".
    pub fn new(location_id: &str, festival_id: &str) -> Self {
        let non_blank = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            location_id: non_blank(location_id),
            festival_id: non_blank(festival_id),
        }
    }

    pub fn includes(&self, source: ReviewSource, source_id: RecordId) -> bool {
        let (own, other) = match source {
            ReviewSource::Location => (&self.location_id, &self.festival_id),
            ReviewSource::Festival => (&self.festival_id, &self.location_id),
        };
        if other.is_some() {
            return false;
        }
        own.as_deref()
            .map_or(true, |wanted| wanted == source_id.to_string())
    }
}

/// First non-empty text among `keys`.
fn first_text(review: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match review.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Flatten one parent record's embedded reviews.
///
/// Records without an id are skipped since their reviews could not be
/// addressed for deletion.
pub fn flatten_reviews(source: ReviewSource, record: &Record) -> Vec<MergedReview> {
    let Some(source_id) = record_id(record) else {
        return Vec::new();
    };
    let source_name = str_field(record, "name").to_string();

    parse_json_array_value(record.get(REVIEWS_FIELD))
        .iter()
        .enumerate()
        .map(|(index, review)| MergedReview {
            id: format!("{}-{source_id}-{index}", source.id_prefix()),
            source: source.label(),
            source_id,
            source_name: source_name.clone(),
            user: first_text(review, &["name_user_review", "user"])
                .unwrap_or_else(|| "Anonymous".to_string()),
            rating: review_rating(review),
            comment: first_text(review, &["content", "comment"]).unwrap_or_default(),
            time_review: first_text(review, &["time_review"]).unwrap_or_default(),
            review_index: index,
        })
        .collect()
}

/// Merge reviews from several sources into one filtered, sorted collection.
///
/// Order of operations: scope, then case-insensitive search over user,
/// source name, and comment, then a stable sort by rating descending.
pub fn merge_reviews<'a>(
    sources: impl IntoIterator<Item = (ReviewSource, &'a [Record])>,
    scope: &ReviewScope,
    search: &str,
) -> Vec<MergedReview> {
    let needle = search.trim().to_lowercase();

    let mut merged: Vec<MergedReview> = sources
        .into_iter()
        .flat_map(|(source, records)| {
            records
                .iter()
                .filter(move |r| record_id(r).is_some_and(|id| scope.includes(source, id)))
                .flat_map(move |r| flatten_reviews(source, r))
        })
        .filter(|review| needle.is_empty() || review.matches(&needle))
        .collect();

    merged.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    merged
}

/// Remove the review at `index` from a decoded review list.
pub fn remove_review_at(reviews: &mut Vec<Value>, index: i64) -> Result<Value, CoreError> {
    let len = reviews.len();
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(reviews.remove(i)),
        _ => Err(CoreError::IndexOutOfRange { index, len }),
    }
}

/// Totals across all embedded reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub location_reviews: usize,
    pub festival_reviews: usize,
    pub average_rating: f64,
}

impl ReviewStats {
    /// Fold location and festival records into review totals in one pass.
    pub fn collect(locations: &[Record], festivals: &[Record]) -> Self {
        let mut rating_sum = 0.0;
        let mut rating_count = 0usize;
        let mut count_reviews = |records: &[Record]| -> usize {
            records
                .iter()
                .map(|record| {
                    let reviews = parse_json_array_value(record.get(REVIEWS_FIELD));
                    rating_sum += reviews.iter().map(review_rating).sum::<f64>();
                    rating_count += reviews.len();
                    reviews.len()
                })
                .sum()
        };

        let location_reviews = count_reviews(locations);
        let festival_reviews = count_reviews(festivals);

        let average_rating = if rating_count > 0 {
            round_one_decimal(rating_sum / rating_count as f64)
        } else {
            0.0
        };

        Self {
            total_reviews: location_reviews + festival_reviews,
            location_reviews,
            festival_reviews,
            average_rating,
        }
    }
}
