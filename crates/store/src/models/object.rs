//! Objects recognized by the camera AI feature.

use serde::Deserialize;
use voyage_core::error::CoreError;
use voyage_core::types::Record;

use super::Shaper;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ObjectInput {
    pub fn into_create_record(self) -> Result<Record, CoreError> {
        if self.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(CoreError::Validation("Title is required".into()));
        }
        Ok(self.shape(Shaper::create()))
    }

    pub fn into_update_record(self) -> Record {
        self.shape(Shaper::update())
    }

    fn shape(self, shaper: Shaper) -> Record {
        shaper
            .trimmed("title", self.title)
            .text("content", self.content)
            .finish()
    }
}
