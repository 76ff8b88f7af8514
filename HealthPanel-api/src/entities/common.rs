use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use health_panel_domain::services::RecordServiceError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create a conflict error response
    pub fn conflict(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "conflict".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    /// HTTP status for this error code
    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<RecordServiceError> for ErrorResponse {
    fn from(err: RecordServiceError) -> Self {
        match err {
            RecordServiceError::NotFound(_) => ErrorResponse::not_found("session"),
            RecordServiceError::NoFiles => ErrorResponse::bad_request("No files were supplied"),
            RecordServiceError::IncompleteRecord(reason) => ErrorResponse::conflict(
                "The session has no processed record yet",
                Some(serde_json::json!({ "reason": reason })),
            ),
            RecordServiceError::RepositoryError(_) => ErrorResponse::internal_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (RecordServiceError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (RecordServiceError::NoFiles, StatusCode::BAD_REQUEST),
            (RecordServiceError::IncompleteRecord("x".to_string()), StatusCode::CONFLICT),
            (
                RecordServiceError::RepositoryError("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = RecordServiceError::RepositoryError("lock poisoned".to_string());
        let response = ErrorResponse::from(err);
        assert_eq!(response.message, "An unexpected error occurred");
        assert!(response.details.is_none());
    }
}
