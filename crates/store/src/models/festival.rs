//! Festival input and display shaping.

use serde::Deserialize;
use serde_json::Value;
use voyage_core::error::CoreError;
use voyage_core::transform::{
    array_to_comma_value, array_to_newline_value, comma_to_array, newline_to_array, EMPTY_ARRAY,
};
use voyage_core::types::Record;
use voyage_core::virtual_field::{ReviewSummary, REVIEWS_FIELD};

use super::Shaper;

/// Price level stored when none is given.
pub const DEFAULT_PRICE_LEVEL: i64 = 1;

/// Create or update payload for a festival.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FestivalInput {
    pub name: Option<String>,
    /// Comma-separated type names.
    pub types: Option<String>,
    pub description: Option<String>,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub price_level: Option<Value>,
    /// Newline-separated URLs.
    pub images: Option<String>,
    /// Newline-separated URLs.
    pub videos: Option<String>,
    /// Free text; not a list for festivals.
    pub advise: Option<String>,
}

impl FestivalInput {
    fn shape(self, shaper: Shaper) -> Record {
        shaper
            .text("name", self.name)
            .encoded("types", self.types, comma_to_array)
            .text("description", self.description)
            .text("event_time", self.event_time)
            .text("location", self.location)
            .int_or("price_level", self.price_level, DEFAULT_PRICE_LEVEL)
            .encoded("images", self.images, newline_to_array)
            .encoded("videos", self.videos, newline_to_array)
            .text("advise", self.advise)
            .on_create(REVIEWS_FIELD, Value::from(EMPTY_ARRAY))
            .finish()
    }

    pub fn into_create_record(self) -> Result<Record, CoreError> {
        if self.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err(CoreError::Validation("Name is required".into()));
        }
        Ok(self.shape(Shaper::create()))
    }

    pub fn into_update_record(self) -> Record {
        self.shape(Shaper::update())
    }
}

pub fn decorate_festival(mut record: Record) -> Record {
    let displays = [
        ("types_display", array_to_comma_value(record.get("types"))),
        ("images_display", array_to_newline_value(record.get("images"))),
        ("videos_display", array_to_newline_value(record.get("videos"))),
    ];
    for (key, text) in displays {
        record.insert(key.to_string(), Value::String(text));
    }
    ReviewSummary::of(&record).apply(&mut record);
    record
}
