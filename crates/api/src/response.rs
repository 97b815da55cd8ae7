//! Shared response envelope types for API handlers.
//!
//! Every successful response uses `{ "success": true, ... }`. Use
//! [`ApiResponse`] instead of ad-hoc `json!` bodies so the envelope stays
//! consistent.

use serde::Serialize;

/// Standard `{ "success": true, "data": T, "message"? }` envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::data(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl ApiResponse<()> {
    /// A bare acknowledgement: `{ "success": true, "message": ... }`.
    pub fn message(message: &'static str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_envelope_omits_message() {
        let body = serde_json::to_value(ApiResponse::data(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn message_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Deleted" }));

        let body = serde_json::to_value(ApiResponse::data(1).with_message("Created")).unwrap();
        assert_eq!(body, json!({ "success": true, "data": 1, "message": "Created" }));
    }
}
