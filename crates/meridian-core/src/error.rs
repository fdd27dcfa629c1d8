//! Error types for Meridian.
//!
//! This module provides [`ApiError`], the error type returned by operation
//! callbacks, dispatch hooks and container setup. Each error belongs to an
//! [`ErrorCategory`] that maps to an HTTP status code, and converts into the
//! serializable [`ErrorBody`] that is documented as the `Error` resource.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Client input could not be used (bad query value, malformed body).
    Validation,
    /// The addressed thing does not exist or is not available.
    NotFound,
    /// Programmer or deployment error detected at setup or first access.
    Configuration,
    /// Anything else.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Configuration | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Standard error type for Meridian.
///
/// # Example
///
/// ```
/// use meridian_core::{ApiError, ErrorCategory};
///
/// let err = ApiError::not_found_with_code("Not found", 40401);
/// assert_eq!(err.category(), ErrorCategory::NotFound);
/// assert_eq!(err.to_error_body().code, 40401);
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client input was rejected.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// Not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// Application error code (status * 100 + discriminator).
        code: u32,
        /// Extra detail aimed at API developers.
        developer_message: Option<String>,
    },

    /// Setup-time misuse, such as rebinding an operation to another owner.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not found error with the generic 40400 code.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::not_found_with_code(message, 40400)
    }

    /// Creates a not found error with a specific application code.
    #[must_use]
    pub fn not_found_with_code(message: impl Into<String>, code: u32) -> Self {
        Self::NotFound {
            message: message.into(),
            code,
            developer_message: None,
        }
    }

    /// Adds a developer message to a not found error. Other kinds are unchanged.
    #[must_use]
    pub fn with_developer_message(mut self, detail: impl Into<String>) -> Self {
        if let Self::NotFound {
            developer_message, ..
        } = &mut self
        {
            *developer_message = Some(detail.into());
        }
        self
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Converts this error into the documented `Error` resource shape.
    #[must_use]
    pub fn to_error_body(&self) -> ErrorBody {
        let status = self.status_code().as_u16();
        match self {
            Self::NotFound {
                message,
                code,
                developer_message,
            } => ErrorBody {
                status,
                code: *code,
                message: message.clone(),
                developer_message: developer_message.clone(),
                meta: None,
            },
            Self::Validation { message }
            | Self::Configuration { message }
            | Self::Internal { message, .. } => ErrorBody {
                status,
                code: u32::from(status) * 100,
                message: message.clone(),
                developer_message: None,
                meta: None,
            },
        }
    }
}

/// Serializable error body returned to clients.
///
/// Field names match the `Error` definition emitted into generated
/// specifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub status: u16,
    /// Application error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Extra detail aimed at API developers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_message: Option<String>,
    /// Additional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = ApiError::validation("offset must be an integer");
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("offset"));
    }

    #[test]
    fn test_not_found_body() {
        let error = ApiError::not_found_with_code("Swagger not available.", 40442)
            .with_developer_message("Swagger API is detached from a parent container.");
        let body = error.to_error_body();
        assert_eq!(body.status, 404);
        assert_eq!(body.code, 40442);
        assert_eq!(
            body.developer_message.as_deref(),
            Some("Swagger API is detached from a parent container.")
        );
    }

    #[test]
    fn test_configuration_error() {
        let error = ApiError::configuration("operation already bound");
        assert_eq!(error.category(), ErrorCategory::Configuration);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_error_body().code, 50000);
    }

    #[test]
    fn test_internal_error_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let error = ApiError::internal_with_source("read failed", io);
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_error_body_serialization() {
        let body = ApiError::not_found("missing").to_error_body();
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"code\":40400"));
        assert!(!json.contains("developer_message"));
    }

    #[test]
    fn test_all_error_categories_have_status_codes() {
        let categories = [
            ErrorCategory::Validation,
            ErrorCategory::NotFound,
            ErrorCategory::Configuration,
            ErrorCategory::Internal,
        ];

        for category in categories {
            let status = category.default_status_code();
            assert!(status.is_client_error() || status.is_server_error());
        }
    }
}
