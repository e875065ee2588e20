//! Response types for the site payroll API.
//!
//! Successful responses are `{ "success": true, "data": ... }`; failures are
//! `{ "success": false, "error": ..., "code": ... }` with a matching status.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Response of `POST /preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewCreated {
    /// Always `true`.
    pub success: bool,
    /// The new session id.
    pub id: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// 400 with a `VALIDATION_ERROR` body.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new("VALIDATION_ERROR", message),
        }
    }

    /// 401 for a missing or unknown bearer token.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::new("UNAUTHORIZED", "Unauthorized"),
        }
    }

    /// 403 for an authenticated caller without the required role.
    pub fn forbidden(details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            error: ApiError::with_details("FORBIDDEN", "Forbidden", details),
        }
    }

    /// 404 with the plain `Not found` message.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new("NOT_FOUND", "Not found"),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            PayrollError::InvalidEntry { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ENTRY", message),
            ),
            PayrollError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            PayrollError::InvalidPreview { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PREVIEW", message),
            ),
            PayrollError::UnknownWorker { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("WORKER_NOT_FOUND", message),
            ),
            PayrollError::SnapshotNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details("NOT_FOUND", "Not found", message),
            ),
            PayrollError::SnapshotPaid { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("SNAPSHOT_PAID", message),
            ),
            PayrollError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("INVALID_TRANSITION", message),
            ),
            PayrollError::PayOutOfRange { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("PAY_OUT_OF_RANGE", message),
            ),
            PayrollError::StaleSnapshot { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "CONFLICT",
                    message,
                    "The snapshot was changed by another request; retry",
                ),
            ),
        };
        Self { status, error }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::new("VALIDATION_ERROR", body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"error\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_snapshot_not_found_maps_to_404() {
        let response: ApiErrorResponse = PayrollError::SnapshotNotFound {
            worker_id: "w-001".to_string(),
            year: 2026,
            month: 1,
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.error, "Not found");
    }

    #[test]
    fn test_paid_and_stale_map_to_409() {
        let paid: ApiErrorResponse = PayrollError::SnapshotPaid {
            worker_id: "w-001".to_string(),
            year: 2026,
            month: 1,
        }
        .into();
        assert_eq!(paid.status, StatusCode::CONFLICT);

        let stale: ApiErrorResponse = PayrollError::StaleSnapshot {
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(stale.status, StatusCode::CONFLICT);
        assert_eq!(stale.error.code, "CONFLICT");
    }

    #[test]
    fn test_pay_out_of_range_maps_to_422() {
        let response: ApiErrorResponse = PayrollError::PayOutOfRange {
            worker_id: "w-001".to_string(),
            message: "gross pay overflowed".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "PAY_OUT_OF_RANGE");
    }

    #[test]
    fn test_invalid_period_maps_to_400() {
        let response: ApiErrorResponse = PayrollError::InvalidPeriod {
            year: 2026,
            month: 13,
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_PERIOD");
    }

    #[test]
    fn test_config_error_maps_to_500() {
        let response: ApiErrorResponse = PayrollError::ConfigNotFound {
            path: "/x".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
