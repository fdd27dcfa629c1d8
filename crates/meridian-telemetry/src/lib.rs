//! Structured logging for Meridian.
//!
//! Every Meridian crate logs through [`tracing`] with structured fields
//! (`operation_id`, `sort_key`, `path`, ...). This crate installs the
//! subscriber that renders them, either as JSON lines or as human-readable
//! output, filtered by an [`EnvFilter`](tracing_subscriber::EnvFilter)
//! directive.
//!
//! # Example
//!
//! ```rust,no_run
//! use meridian_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).unwrap();
//!
//! tracing::debug!(operation_id = "list_books", sort_key = 3, "operation registered");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
