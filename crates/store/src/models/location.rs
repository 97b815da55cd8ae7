//! Location input and display shaping.

use serde::Deserialize;
use serde_json::Value;
use voyage_core::error::CoreError;
use voyage_core::transform::{
    array_to_comma_value, array_to_newline_value, comma_to_array, newline_to_array, EMPTY_ARRAY,
};
use voyage_core::types::Record;
use voyage_core::virtual_field::{ReviewSummary, REVIEWS_FIELD};

use super::Shaper;

/// Create or update payload for a location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    pub name: Option<String>,
    /// Comma-separated type names.
    pub types: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub address: Option<String>,
    pub lat: Option<Value>,
    pub long: Option<Value>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    /// Newline-separated URLs.
    pub images: Option<String>,
    /// Newline-separated URLs.
    pub videos: Option<String>,
    /// Newline-separated advice lines.
    pub advise: Option<String>,
    pub marker: Option<Value>,
}

impl LocationInput {
    fn shape(self, shaper: Shaper) -> Record {
        shaper
            .text("name", self.name)
            .encoded("types", self.types, comma_to_array)
            .text("description", self.description)
            .text("long_description", self.long_description)
            .text("address", self.address)
            .float("lat", self.lat)
            .float("long", self.long)
            .text("phone", self.phone)
            .text("website", self.website)
            .text("opening_hours", self.opening_hours)
            .encoded("images", self.images, newline_to_array)
            .encoded("videos", self.videos, newline_to_array)
            .encoded("advise", self.advise, newline_to_array)
            .flag("marker", self.marker)
            .on_create(REVIEWS_FIELD, Value::from(EMPTY_ARRAY))
            .finish()
    }

    /// Every column, with defaults. A new location starts with no reviews.
    pub fn into_create_record(self) -> Result<Record, CoreError> {
        if self.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err(CoreError::Validation("Name is required".into()));
        }
        Ok(self.shape(Shaper::create()))
    }

    /// Only the provided columns.
    pub fn into_update_record(self) -> Record {
        self.shape(Shaper::update())
    }
}

/// Payload for `PATCH /locations/{id}/marker`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerUpdate {
    pub marker: bool,
}

/// Add display text and review-derived fields.
pub fn decorate_location(mut record: Record) -> Record {
    let displays = [
        ("types_display", array_to_comma_value(record.get("types"))),
        ("images_display", array_to_newline_value(record.get("images"))),
        ("videos_display", array_to_newline_value(record.get("videos"))),
        ("advise_display", array_to_newline_value(record.get("advise"))),
    ];
    for (key, text) in displays {
        record.insert(key.to_string(), Value::String(text));
    }
    ReviewSummary::of(&record).apply(&mut record);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> LocationInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_shapes_every_column() {
        let record = input(json!({
            "name": "My Khe Beach",
            "types": "beach, swimming,",
            "lat": "16.05",
            "long": 108.25,
            "images": "https://a.jpg\n\nhttps://b.jpg",
        }))
        .into_create_record()
        .unwrap();

        assert_eq!(record["types"], json!(r#"["beach","swimming"]"#));
        assert_eq!(record["images"], json!(r#"["https://a.jpg","https://b.jpg"]"#));
        assert_eq!(record["videos"], json!("[]"));
        assert_eq!(record["lat"], json!(16.05));
        assert_eq!(record["long"], json!(108.25));
        assert_eq!(record["marker"], json!(true));
        assert_eq!(record["reviews"], json!("[]"));
        assert_eq!(record["phone"], json!(""));
    }

    #[test]
    fn create_requires_a_name() {
        assert!(matches!(
            input(json!({ "name": "  " })).into_create_record(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn update_sends_only_provided_fields() {
        let record = input(json!({ "marker": false, "lat": "bad" })).into_update_record();
        assert_eq!(Value::Object(record), json!({ "marker": false, "lat": 0.0 }));
    }

    #[test]
    fn decorate_adds_display_and_rating_fields() {
        let record = json!({
            "Id": 1,
            "types": r#"["beach","food"]"#,
            "advise": r#"["Go early","Bring water"]"#,
            "reviews": r#"[{"start":5},{"start":4}]"#,
        });
        let decorated = decorate_location(record.as_object().cloned().unwrap());
        assert_eq!(decorated["types_display"], json!("beach, food"));
        assert_eq!(decorated["advise_display"], json!("Go early\nBring water"));
        assert_eq!(decorated["images_display"], json!(""));
        assert_eq!(decorated["calculated_rating"], json!(4.5));
        assert_eq!(decorated["review_count"], json!(2));
    }
}
