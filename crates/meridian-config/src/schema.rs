//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::path::PathBuf;

use meridian_core::ListingOptions;
use meridian_docs::{SwaggerSpec, SwaggerSpecBuilder};
use meridian_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Swagger documentation section.
///
/// # Example
///
/// ```
/// use meridian_config::DocsConfig;
///
/// let config = DocsConfig {
///     title: "Library".to_string(),
///     enable_ui: true,
///     ..Default::default()
/// };
/// let swagger = config.swagger_builder().build().unwrap();
/// assert!(swagger.ui_enabled());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// API title published in `info.title`.
    #[serde(default = "default_title")]
    pub title: String,

    /// Serve the Swagger UI page and its assets.
    #[serde(default)]
    pub enable_ui: bool,

    /// Published host. The request host is used when unset.
    #[serde(default)]
    pub host: Option<String>,

    /// Published transfer protocols.
    #[serde(default)]
    pub schemes: Vec<String>,

    /// Directory holding `ui.html` and its assets. The bundled assets are
    /// used when unset.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Leading path segments cut from documented paths. Defaults to the
    /// length of the parent container's own prefix.
    #[serde(default)]
    pub strip_segments: Option<usize>,

    /// Content types listed under `consumes` and `produces`.
    #[serde(default = "default_content_types")]
    pub content_types: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            enable_ui: false,
            host: None,
            schemes: Vec::new(),
            static_dir: None,
            strip_segments: None,
            content_types: default_content_types(),
        }
    }
}

impl DocsConfig {
    /// A [`SwaggerSpec`] builder carrying these settings.
    pub fn swagger_builder(&self) -> SwaggerSpecBuilder {
        let mut builder = SwaggerSpec::builder(self.title.as_str())
            .enable_ui(self.enable_ui)
            .schemes(self.schemes.iter().cloned())
            .content_types(self.content_types.iter().cloned());
        if let Some(host) = &self.host {
            builder = builder.host(host.as_str());
        }
        if let Some(dir) = &self.static_dir {
            builder = builder.static_dir(dir.clone());
        }
        if let Some(count) = self.strip_segments {
            builder = builder.strip_segments(count);
        }
        builder
    }
}

/// Pagination defaults for listing operations.
///
/// A cap of zero is treated as unset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ListingConfig {
    /// Offset used when a request has none.
    #[serde(default)]
    pub default_offset: u64,

    /// Limit used when a request has none.
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Largest accepted offset.
    #[serde(default)]
    pub max_offset: Option<u64>,

    /// Largest accepted limit.
    #[serde(default)]
    pub max_limit: Option<u64>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_offset: 0,
            default_limit: default_limit(),
            max_offset: None,
            max_limit: None,
        }
    }
}

impl ListingConfig {
    /// Options for [`shortcuts::listing_with`](meridian_core::shortcuts::listing_with).
    #[must_use]
    pub fn to_options(&self) -> ListingOptions {
        let mut options = ListingOptions::new(self.default_offset, self.default_limit);
        if let Some(max) = self.max_offset {
            options = options.max_offset(max);
        }
        if let Some(max) = self.max_limit {
            options = options.max_limit(max);
        }
        options
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line in log lines.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Settings for [`meridian_telemetry::init_logging`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: self.enabled,
            file_line_info: self.include_location,
            ..base.with_level(self.level.as_str())
        }
    }
}

fn default_title() -> String {
    "API".to_string()
}

fn default_content_types() -> Vec<String> {
    vec!["application/json".to_string()]
}

const fn default_limit() -> u64 {
    50
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_defaults() {
        let config = DocsConfig::default();
        assert_eq!(config.title, "API");
        assert!(!config.enable_ui);
        assert_eq!(config.content_types, vec!["application/json"]);
        assert!(config.strip_segments.is_none());
    }

    #[test]
    fn test_docs_partial_deserialization() {
        let config: DocsConfig = toml::from_str(r#"title = "Library""#).unwrap();
        assert_eq!(config.title, "Library");
        assert_eq!(config.content_types, vec!["application/json"]);
    }

    #[test]
    fn test_swagger_builder() {
        let config = DocsConfig {
            title: "Library".to_string(),
            enable_ui: true,
            host: Some("api.example.com".to_string()),
            ..Default::default()
        };
        let swagger = config.swagger_builder().build().unwrap();
        assert_eq!(swagger.title(), "Library");
        assert_eq!(swagger.operations().len(), 3);
    }

    #[test]
    fn test_listing_defaults() {
        let config = ListingConfig::default();
        assert_eq!(config.to_options(), ListingOptions::default());
    }

    #[test]
    fn test_listing_caps() {
        let config = ListingConfig {
            default_limit: 20,
            max_limit: Some(100),
            max_offset: Some(0),
            ..Default::default()
        };
        let options = config.to_options();
        assert_eq!(options.default_limit, 20);
        assert_eq!(options.max_limit, Some(100));
        assert_eq!(options.max_offset, None);
    }

    #[test]
    fn test_logging_conversion() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            ..Default::default()
        };
        let log = config.to_log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert!(!log.file_line_info);
        assert!(log.enabled);
    }

    #[test]
    fn test_log_format_deserialization() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "pretty"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ListingConfig, _> = toml::from_str("page_size = 10");
        assert!(result.is_err());
    }
}
