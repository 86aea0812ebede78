//! Error response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response format.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "code": "VALIDATION_ERROR",
    "message": "Request validation failed",
    "details": "email: Invalid email format",
    "request_id": "3f1c2a9e-8d0b-4d5e-9a51-0c6f2b7d9e10"
}))]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(json, serde_json::json!({"code": "NOT_FOUND", "message": "gone"}));
    }

    #[test]
    fn test_builder_sets_details_and_request_id() {
        let response = ErrorResponse::new("VALIDATION_ERROR", "bad")
            .with_details(Some("name: required".to_string()))
            .with_request_id(Some("req-1".to_string()));
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["details"], "name: required");
        assert_eq!(json["request_id"], "req-1");
    }
}
