//! # Meridian Docs
//!
//! Swagger 2.0 documentation for Meridian operation trees.
//!
//! This crate provides:
//! - **Specification synthesis** from any [`OperationSource`](meridian_core::OperationSource)
//! - **`SwaggerSpec`** container serving the document of its parent
//! - **Swagger UI** page and static assets, read from a sandboxed directory
//!
//! ## Quick Start
//!
//! ```
//! use meridian_core::{fixtures, ApiContainer};
//! use meridian_docs::{SwaggerGenerator, SwaggerSpec};
//!
//! let swagger = SwaggerSpec::builder("Library").enable_ui(true).build().unwrap();
//! let v1 = ApiContainer::version(1)
//!     .add(fixtures::library_api().unwrap())
//!     .add(swagger)
//!     .build()
//!     .unwrap();
//!
//! let json = SwaggerGenerator::new("Library")
//!     .version("1")
//!     .base_path("/api/v1")
//!     .generate_json(v1.as_ref())
//!     .unwrap();
//! assert!(json.contains("\"/swagger/ui\""));
//! ```
//!
//! ## Determinism
//!
//! Paths, methods, responses and definitions are kept in insertion order, so
//! generating twice from an unchanged tree yields identical output.

mod assets;
mod document;
mod error;
mod generator;
mod swagger;

pub use assets::StaticAssets;
pub use document::{Info, PathItem, SwaggerDocument, SWAGGER_VERSION};
pub use error::{DocsError, DocsResult, ASSET_NOT_FOUND_CODE};
pub use generator::{path_parameters, resource_definition, ParsedOperations, SwaggerGenerator};
pub use swagger::{SwaggerSpec, SwaggerSpecBuilder, SWAGGER_TAG, SWAGGER_UNAVAILABLE_CODE};
