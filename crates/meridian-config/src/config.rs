//! Main configuration types.
//!
//! This module provides the top-level [`MeridianConfig`] struct and its builder.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConfigError, DocsConfig, ListingConfig, LoggingConfig};

/// Schemes accepted in `docs.schemes`.
const VALID_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

/// Complete Meridian configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use meridian_config::MeridianConfig;
///
/// let config = MeridianConfig::default();
/// assert_eq!(config.listing.default_limit, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MeridianConfig {
    /// Swagger documentation.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Listing pagination defaults.
    #[serde(default)]
    pub listing: ListingConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MeridianConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use meridian_config::{ListingConfig, MeridianConfig};
    ///
    /// let config = MeridianConfig::builder()
    ///     .listing(ListingConfig {
    ///         default_limit: 20,
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.listing.default_limit, 20);
    /// ```
    #[must_use]
    pub fn builder() -> MeridianConfigBuilder {
        MeridianConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `docs.title` is empty
    /// - a scheme is not one of `http`, `https`, `ws`, `wss`
    /// - `listing.default_limit` is zero
    /// - `listing.max_limit` is set below `listing.default_limit`
    /// - `listing.max_offset` is set below `listing.default_offset`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.docs.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("docs.title", "must not be empty"));
        }

        if let Some(scheme) = self
            .docs
            .schemes
            .iter()
            .find(|s| !VALID_SCHEMES.contains(&s.as_str()))
        {
            return Err(ConfigError::invalid_value(
                "docs.schemes",
                format!("unsupported scheme `{scheme}`, expected one of http, https, ws, wss"),
            ));
        }

        let listing = &self.listing;
        if listing.default_limit == 0 {
            return Err(ConfigError::invalid_value("listing.default_limit", "must be at least 1"));
        }
        if let Some(max) = listing.max_limit.filter(|&max| max != 0) {
            if max < listing.default_limit {
                return Err(ConfigError::invalid_value(
                    "listing.max_limit",
                    format!("must not be below default_limit ({})", listing.default_limit),
                ));
            }
        }
        if let Some(max) = listing.max_offset.filter(|&max| max != 0) {
            if max < listing.default_offset {
                return Err(ConfigError::invalid_value(
                    "listing.max_offset",
                    format!("must not be below default_offset ({})", listing.default_offset),
                ));
            }
        }

        debug!(title = %self.docs.title, "configuration validated");
        Ok(())
    }

    /// Development preset: UI enabled, pretty debug logs.
    ///
    /// # Example
    ///
    /// ```
    /// use meridian_config::MeridianConfig;
    ///
    /// let config = MeridianConfig::development();
    /// assert!(config.docs.enable_ui);
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.docs.enable_ui = true;
        config.docs.schemes = vec!["http".to_string()];

        config.logging.level = "debug".to_string();
        config.logging.format = meridian_telemetry::LogFormat::Pretty;
        config.logging.include_location = true;

        config
    }

    /// Production preset: UI disabled, JSON info logs, capped listings.
    ///
    /// # Example
    ///
    /// ```
    /// use meridian_config::MeridianConfig;
    ///
    /// let config = MeridianConfig::production();
    /// assert_eq!(config.logging.format, meridian_telemetry::LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.docs.enable_ui = false;
        config.docs.schemes = vec!["https".to_string()];

        config.listing.max_limit = Some(1000);

        config.logging.level = "info".to_string();
        config.logging.format = meridian_telemetry::LogFormat::Json;

        config
    }
}

/// Builder for [`MeridianConfig`].
#[derive(Debug, Default)]
pub struct MeridianConfigBuilder {
    docs: Option<DocsConfig>,
    listing: Option<ListingConfig>,
    logging: Option<LoggingConfig>,
}

impl MeridianConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the documentation configuration.
    #[must_use]
    pub fn docs(mut self, docs: DocsConfig) -> Self {
        self.docs = Some(docs);
        self
    }

    /// Set the listing configuration.
    #[must_use]
    pub fn listing(mut self, listing: ListingConfig) -> Self {
        self.listing = Some(listing);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> MeridianConfig {
        MeridianConfig {
            docs: self.docs.unwrap_or_default(),
            listing: self.listing.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<MeridianConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
