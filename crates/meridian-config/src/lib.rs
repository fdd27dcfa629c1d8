//! Typed configuration for Meridian.
//!
//! This crate loads the settings a Meridian deployment needs around its
//! API tree:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`MeridianConfig`] holds three sections:
//!
//! - [`DocsConfig`] - Swagger document and UI settings
//! - [`ListingConfig`] - pagination defaults for listing operations
//! - [`LoggingConfig`] - structured logging
//!
//! # Example
//!
//! ```no_run
//! use meridian_config::ConfigLoader;
//!
//! # fn main() -> Result<(), meridian_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("meridian.toml")?
//!     .with_env_prefix("MERIDIAN")
//!     .load()?;
//!
//! let swagger = config.docs.swagger_builder().build();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [docs]
//! title = "Library"
//! enable_ui = true
//! schemes = ["https"]
//! host = "books.example.com"
//!
//! [listing]
//! default_limit = 50
//! max_limit = 1000
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables named `PREFIX__SECTION__KEY`:
//!
//! - `MERIDIAN__DOCS__ENABLE_UI=true`
//! - `MERIDIAN__DOCS__SCHEMES=http,https`
//! - `MERIDIAN__LISTING__MAX_LIMIT=none`
//! - `MERIDIAN__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MeridianConfig::default();
        assert_eq!(config.docs.title, "API");
        assert_eq!(config.listing.to_options(), meridian_core::ListingOptions::default());
    }

    #[test]
    fn test_config_drives_swagger() {
        let config = ConfigLoader::new()
            .with_string("[docs]\ntitle = \"Library\"\nstrip_segments = 0", "toml")
            .unwrap()
            .load()
            .unwrap();

        let swagger = config.docs.swagger_builder().build().unwrap();
        assert_eq!(swagger.title(), "Library");
    }
}
