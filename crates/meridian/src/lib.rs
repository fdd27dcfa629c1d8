//! # Meridian
//!
//! **Self-documenting resource APIs**
//!
//! Meridian describes an API as a tree of operations and renders that tree
//! as a Swagger 2.0 document:
//!
//! - **Operations** – a callback, its URL path, HTTP methods, parameters and responses
//! - **Shortcuts** – conventional listing/create/detail/update/patch/delete operations
//! - **Containers** – resource APIs and prefixed containers (`/api`, `/v1`) composed into a tree
//! - **Swagger** – a container that documents its parent and serves the Swagger UI
//!
//! ## Quick Start
//!
//! ```
//! use meridian::prelude::*;
//!
//! let swagger = SwaggerSpec::builder("Library").build().unwrap();
//! let v1 = ApiContainer::version(1)
//!     .add(meridian::core::fixtures::library_api().unwrap())
//!     .add(swagger.clone())
//!     .build()
//!     .unwrap();
//! let _api = ApiContainer::interface().add(v1).build().unwrap();
//!
//! assert_eq!(swagger.swagger_path().render(), "/api/v1/swagger");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ApiContainer("api") ─→ ApiContainer("v1") ─┬→ ResourceApi("book")  ─→ Operation…
//!                                            └→ SwaggerSpec("swagger") ─→ get_swagger, get_ui, get_static
//! ```

#![doc(html_root_url = "https://docs.rs/meridian/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use meridian_core as core;

// Re-export documentation types
pub use meridian_docs as docs;

// Re-export configuration types
pub use meridian_config as config;

// Re-export logging setup
pub use meridian_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use meridian::prelude::*;
///
/// let path = UrlPath::parse("/book/{resource_id:int}");
/// assert_eq!(path.render(), "/book/{resource_id}");
/// ```
pub mod prelude {
    pub use meridian_core::{
        shortcuts, ApiContainer, ApiError, ApiResult, Binding, Callback, In, Invocation,
        ListingOptions, Operation, OperationSource, Param, PathArgs, RawResponse, Reply, Request,
        Resource, ResourceApi, ResourceDef, ResponseEntry, UrlPath,
    };

    pub use meridian_core::doc::SchemaType;

    pub use meridian_docs::{SwaggerDocument, SwaggerGenerator, SwaggerSpec};

    pub use meridian_config::{ConfigLoader, MeridianConfig};

    pub use meridian_telemetry::{init_logging, LogConfig, LogFormat};
}
