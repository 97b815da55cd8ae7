//! Objectives (collectible items) stored in the `items` table.

use serde::Deserialize;
use serde_json::Value;
use voyage_core::error::CoreError;
use voyage_core::types::Record;

use super::Shaper;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectiveInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub points: Option<Value>,
    pub image: Option<String>,
}

impl ObjectiveInput {
    pub fn into_create_record(self) -> Result<Record, CoreError> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&self.name) || blank(&self.kind) {
            return Err(CoreError::Validation("Name and type are required".into()));
        }
        Ok(Shaper::create()
            .trimmed("name", self.name)
            .text("type", self.kind)
            .text("description", self.description)
            .number("points", self.points)
            .text("image", self.image)
            .finish())
    }

    pub fn into_update_record(self) -> Record {
        let mut record = Shaper::update()
            .trimmed("name", self.name)
            .text("type", self.kind)
            .text("description", self.description)
            .text("image", self.image)
            .finish();
        if let Some(points) = self.points {
            record.insert("points".into(), points);
        }
        record
    }
}
