//! Error types for the documentation crate.
//!
//! This module defines errors that can occur while rendering the Swagger
//! document and while loading documentation UI assets.

use meridian_core::ApiError;
use thiserror::Error;

/// Error code returned for every static asset that cannot be served.
pub const ASSET_NOT_FOUND_CODE: u32 = 40401;

/// Errors that can occur during documentation generation and serving.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the Swagger document to JSON.
    #[error("Failed to serialize Swagger document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The requested asset does not exist under the static root.
    #[error("Static asset not found: {name}")]
    AssetNotFound {
        /// The requested file name.
        name: String,
    },

    /// The requested asset resolves outside the static root.
    #[error("Static asset escapes root directory: {name}")]
    PathEscapesRoot {
        /// The requested file name.
        name: String,
    },

    /// IO error when reading files.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

impl From<DocsError> for ApiError {
    fn from(err: DocsError) -> Self {
        match err {
            DocsError::SerializationError(source) => {
                Self::internal_with_source("Failed to render Swagger document", source)
            }
            DocsError::AssetNotFound { .. } | DocsError::PathEscapesRoot { .. } | DocsError::IoError(_) => {
                Self::not_found_with_code("Not found", ASSET_NOT_FOUND_CODE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_serialization_error() {
        let err: DocsError = serde_json::from_str::<String>("invalid").unwrap_err().into();
        assert!(matches!(err, DocsError::SerializationError(_)));
        assert!(err.to_string().contains("serialize"));

        let api: ApiError = err.into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_asset_errors_become_not_found() {
        for err in [
            DocsError::AssetNotFound { name: "missing.js".to_string() },
            DocsError::PathEscapesRoot { name: "../../etc/passwd".to_string() },
            DocsError::IoError(std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
            assert_eq!(api.to_error_body().code, ASSET_NOT_FOUND_CODE);
        }
    }

    #[test]
    fn test_escape_message_names_file() {
        let err = DocsError::PathEscapesRoot { name: "../secret".to_string() };
        assert!(err.to_string().contains("../secret"));
    }
}
