//! Test fixtures for Meridian development and testing.
//!
//! This module provides an in-memory [`Request`] implementation and
//! pre-built resources and APIs that can be used in tests across the
//! Meridian workspace.
//!
//! # Example
//!
//! ```
//! use meridian_core::fixtures;
//! use meridian_core::{PathArgs, Reply};
//!
//! let api = fixtures::library_api().unwrap();
//! let list = api.operation("list_books").unwrap();
//!
//! let reply = list
//!     .dispatch(&fixtures::MockRequest::get().query("limit", "1"), PathArgs::new())
//!     .unwrap();
//! assert!(matches!(reply, Reply::Listing(_)));
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::container::ResourceApi;
use crate::error::{ApiError, ApiResult};
use crate::meta::Callback;
use crate::reply::Reply;
use crate::request::Request;
use crate::resource::{Field, FieldType, Resource, ResourceDef, ResourceRef};
use crate::shortcuts;

/// An in-memory request: query string, optional JSON body and host.
#[derive(Debug, Clone, Default)]
pub struct MockRequest {
    method: http::Method,
    query: IndexMap<String, String>,
    body: Option<Value>,
    host: Option<String>,
}

impl MockRequest {
    /// Creates a `GET` request.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// Creates a `POST` request.
    #[must_use]
    pub fn post() -> Self {
        Self {
            method: http::Method::POST,
            ..Self::default()
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &http::Method {
        &self.method
    }
}

impl Request for MockRequest {
    fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    fn deserialize(&self, resource: &dyn Resource) -> ApiResult<Value> {
        self.body.clone().ok_or_else(|| {
            ApiError::validation(format!(
                "request body required for `{}`",
                resource.resource_name()
            ))
        })
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

/// A `library.Book` resource.
#[must_use]
pub fn book_resource() -> ResourceRef {
    Arc::new(
        ResourceDef::new("library.Book")
            .with_field(Field::new("title", FieldType::String).describe("Title of the book"))
            .field("num_pages", FieldType::Integer)
            .field("rrp", FieldType::Number)
            .field("published", FieldType::Date)
            .with_field(Field::new("genre", FieldType::String).choices(["sci-fi", "fantasy", "biography"])),
    )
}

/// A `library.Author` resource.
#[must_use]
pub fn author_resource() -> ResourceRef {
    Arc::new(
        ResourceDef::new("library.Author")
            .field("name", FieldType::String)
            .field("active", FieldType::Boolean),
    )
}

/// A book API with `list_books`, `create_book`, `get_book` and
/// `delete_book` operations backed by a fixed list of titles.
///
/// # Errors
///
/// Propagates binding errors from [`ResourceApiBuilder::build`](crate::ResourceApiBuilder::build).
pub fn library_api() -> ApiResult<Arc<ResourceApi>> {
    let titles = ["Dune", "Emma", "Ulysses"];

    ResourceApi::builder(book_resource())
        .tag("library")
        .operation(
            shortcuts::listing(
                Callback::new("list_books", move |inv| {
                    let offset = usize::try_from(inv.path_arg("offset").and_then(Value::as_u64).unwrap_or(0))
                        .unwrap_or(usize::MAX);
                    let limit = usize::try_from(inv.path_arg("limit").and_then(Value::as_u64).unwrap_or(1))
                        .unwrap_or(usize::MAX);
                    let page: Vec<_> = titles.iter().skip(offset).take(limit).map(|t| json!({"title": t})).collect();
                    Ok(Reply::WithTotal(json!(page), u64::try_from(titles.len()).unwrap_or(u64::MAX)))
                })
                .doc("List all books in the library."),
            )
            .build(),
        )
        .operation(
            shortcuts::create(Callback::new("create_book", |inv| {
                Ok(Reply::Value(inv.args.first().cloned().unwrap_or_default()))
            }))
            .build(),
        )
        .operation(
            shortcuts::detail(Callback::new("get_book", move |inv| {
                let id = inv.path_arg("resource_id").and_then(Value::as_u64).unwrap_or(0);
                usize::try_from(id)
                    .ok()
                    .and_then(|i| titles.get(i))
                    .map(|t| Reply::Value(json!({"title": t})))
                    .ok_or_else(|| ApiError::not_found(format!("book {id} not found")))
            }))
            .build(),
        )
        .operation(shortcuts::delete(Callback::new("delete_book", |_| Ok(Reply::Empty))).build())
        .build()
}
