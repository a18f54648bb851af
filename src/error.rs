//! Structured error types for API responses.
//!
//! "Not found" is deliberately absent: lookups return `Option` and the
//! transport decides how to render absence.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request errors
    InvalidArgument,
    Unauthorized,

    // Internal errors
    StoreFailure,
    InternalError,
}

/// Structured error for API responses.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn invalid_argument(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidArgument, reason).with_field(field)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, "Missing or invalid API key")
    }

    pub fn store(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::StoreFailure, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// Store collaborators report through anyhow; anything that isn't already an
// ApiError came from persistence.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => ApiError::store(format!("{:#}", err)),
        }
    }
}

/// Result type for service operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_serializes_screaming_snake_case() {
        let err = ApiError::invalid_argument("sortField", "Unknown sort field 'NAME'");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVALID_ARGUMENT");
        assert_eq!(json["field"], "sortField");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn anyhow_errors_become_store_failures() {
        let err: ApiError = anyhow::anyhow!("disk I/O error").into();
        assert_eq!(err.code, ErrorCode::StoreFailure);
        assert!(err.message.contains("disk I/O error"));
    }

    #[test]
    fn wrapped_api_errors_survive_anyhow() {
        let original = ApiError::invalid_argument("priority", "bad");
        let err: ApiError = anyhow::Error::new(original).into();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.field.as_deref(), Some("priority"));
    }
}
