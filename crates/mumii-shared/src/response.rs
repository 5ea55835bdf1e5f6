//! JSON error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// Error body: `{"error": "...", "status": 404}` plus optional context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Short human-readable message, safe to show to users.
    pub error: String,

    /// The HTTP status code.
    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request ID for debugging purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
            detail: None,
            request_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(400, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(401, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(404, error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::new(409, error)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Something went wrong!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted() {
        let json = serde_json::to_value(ErrorResponse::not_found("Restaurant not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Restaurant not found", "status": 404})
        );
    }

    #[test]
    fn test_request_id_camel_case() {
        let json =
            serde_json::to_value(ErrorResponse::internal_error().with_request_id("abc")).unwrap();
        assert_eq!(json["requestId"], "abc");
        assert_eq!(json["error"], "Something went wrong!");
    }
}
