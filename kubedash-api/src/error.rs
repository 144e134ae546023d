//! Standardized error handling for API responses
//!
//! Every failure leaves the server as `{status, code, error, timestamp}`.
//! The `error` field carries the human-readable message the UI shows.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::auth::AuthzError;

/// Standard API error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error code for programmatic handling
    pub code: String,

    /// Human-readable error message
    pub error: String,

    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: u16, code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            error: error.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// API error types with standardized responses
#[derive(Debug)]
pub enum ApiError {
    /// 500 Internal Server Error
    Internal(String),

    /// 403 Forbidden
    Forbidden(String),

    /// 400 Bad Request
    BadRequest(String),
}

impl ApiError {
    /// Convert error to ErrorResponse
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Internal(msg) => {
                error!("Internal API error: {}", msg);
                ErrorResponse::new(500, "INTERNAL_ERROR", msg)
            }
            ApiError::Forbidden(msg) => ErrorResponse::new(403, "FORBIDDEN", msg),
            ApiError::BadRequest(msg) => ErrorResponse::new(400, "BAD_REQUEST", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = self.to_error_response();
        let status_code = StatusCode::from_u16(error_response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status_code, Json(error_response)).into_response()
    }
}

impl From<kubedash_common::Error> for ApiError {
    fn from(err: kubedash_common::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_creation() {
        let error = ErrorResponse::new(404, "NOT_FOUND", "Resource not found");
        assert_eq!(error.status, 404);
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.error, "Resource not found");
    }

    #[test]
    fn test_common_error_is_bad_request() {
        let api_err: ApiError = kubedash_common::Error::MissingFields.into();
        let response = api_err.to_error_response();
        assert_eq!(response.status, 400);
        assert_eq!(response.error, "Missing required fields");
    }

    #[test]
    fn test_authz_error_is_forbidden() {
        let api_err: ApiError = AuthzError::Unauthenticated.into();
        let response = api_err.to_error_response();
        assert_eq!(response.status, 403);
        assert_eq!(response.code, "FORBIDDEN");
    }

    #[test]
    fn test_internal_keeps_message() {
        let response = ApiError::Internal("Failed to list secrets: boom".into()).to_error_response();
        assert_eq!(response.status, 500);
        assert_eq!(response.error, "Failed to list secrets: boom");
    }

    #[test]
    fn test_json_serialization() {
        let error = ErrorResponse::new(400, "BAD_REQUEST", "Missing required fields");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["error"], "Missing required fields");
        assert_eq!(json["status"], 400);
    }
}
