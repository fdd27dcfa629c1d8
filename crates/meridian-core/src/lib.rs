//! # Meridian Core
//!
//! Core types for declaring documented, dispatchable API operations.
//!
//! This crate provides the foundational pieces used throughout Meridian:
//!
//! - [`UrlPath`] - Immutable, composable URL path of literals and typed placeholders
//! - [`Operation`] - A callback exposed at a path for a set of methods, with
//!   parameter/response metadata and dispatch hooks
//! - [`shortcuts`] - Conventional `listing`/`create`/`detail`/`update`/`patch`/`delete` factories
//! - [`ResourceApi`] / [`ApiContainer`] - Containers that bind operations and
//!   compose them into a prefixed tree
//! - [`ApiError`] - Standard error type
//!
//! ## Example
//!
//! ```
//! use meridian_core::{shortcuts, Callback, Reply, ResourceApi, ResourceDef, FieldType};
//! use meridian_core::fixtures::MockRequest;
//! use std::sync::Arc;
//!
//! let book = Arc::new(ResourceDef::new("library.Book").field("title", FieldType::String));
//!
//! let list = shortcuts::listing(Callback::new("list_books", |_inv| {
//!     Ok(Reply::WithTotal(serde_json::json!(["Dune"]), 1))
//! }))
//! .build();
//!
//! let api = ResourceApi::builder(book).operation(list).build().unwrap();
//! let request = MockRequest::get().query("bare", "true");
//! let reply = api.operations()[0].dispatch(&request, Default::default()).unwrap();
//! assert_eq!(reply, Reply::Value(serde_json::json!(["Dune"])));
//! ```

#![doc(html_root_url = "https://docs.rs/meridian-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binding;
mod container;
pub mod doc;
mod error;
pub mod fixtures;
mod meta;
mod operation;
mod path;
mod reply;
mod request;
mod resource;
mod sequence;
pub mod shortcuts;

pub use binding::{Binding, PostDispatch, PreDispatch};
pub use container::{
    ApiContainer, ApiContainerBuilder, OperationPaths, OperationSource, ParentLink, ResourceApi,
    ResourceApiBuilder,
};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCategory};
pub use meta::{
    Callback, CallbackFn, In, OperationMeta, Param, ResponseEntry, ResponseStatus, SchemaSource,
};
pub use operation::{
    Invocation, ListingOptions, Operation, OperationBuilder, OperationKind, OperationPath, PathArgs,
};
pub use path::{PathNode, PathParam, UrlPath};
pub use reply::{Listing, RawResponse, Reply};
pub use request::{to_bool, Request};
pub use resource::{
    ErrorResource, Field, FieldType, ListingResource, Resource, ResourceDef, ResourceRef,
};
pub use sequence::Sequence;
