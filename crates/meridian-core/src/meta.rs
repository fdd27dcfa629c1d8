//! Operation metadata records.
//!
//! Documentation metadata (responses, parameters, content types, the
//! deprecated flag) is collected on a [`Callback`] as an explicit
//! [`OperationMeta`] record. When an [`Operation`](crate::Operation) is built
//! the record is merged into the descriptor, so metadata can be declared
//! before or after choosing the operation kind.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::doc::{ParameterDoc, ResponseDoc, Schema, SchemaType};
use crate::error::ApiResult;
use crate::operation::Invocation;
use crate::reply::Reply;
use crate::resource::{ErrorResource, ResourceRef};

/// Signature of an operation callback.
pub type CallbackFn = dyn Fn(Invocation<'_>) -> ApiResult<Reply> + Send + Sync;

/// Where the schema of a response or body parameter comes from.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// The resource resolved by the operation (explicit or from its owner).
    Bound,
    /// A specific resource.
    Resource(ResourceRef),
    /// No schema.
    Omitted,
}

impl SchemaSource {
    fn resolve(&self, bound: Option<&ResourceRef>) -> Option<Schema> {
        match self {
            Self::Bound => bound.map(|r| Schema::definition(r.resource_name())),
            Self::Resource(r) => Some(Schema::definition(r.resource_name())),
            Self::Omitted => None,
        }
    }

    fn resource(&self) -> Option<&ResourceRef> {
        match self {
            Self::Resource(r) => Some(r),
            Self::Bound | Self::Omitted => None,
        }
    }
}

/// Status key of a response entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// Catch-all response for unhandled errors.
    Default,
    /// A specific HTTP status code.
    Code(u16),
}

impl ResponseStatus {
    /// Key used in the documented `responses` map.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Default => "default".to_string(),
            Self::Code(code) => code.to_string(),
        }
    }
}

/// A declared response.
#[derive(Debug, Clone)]
pub struct ResponseEntry {
    /// Status key.
    pub status: ResponseStatus,
    /// Description; `{name}` is replaced by the resolved resource's name.
    pub description: String,
    /// Body schema.
    pub schema: SchemaSource,
}

impl ResponseEntry {
    /// Declares a response whose body is the operation's resource.
    #[must_use]
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Code(status),
            description: description.into(),
            schema: SchemaSource::Bound,
        }
    }

    /// The standing "unhandled error" response every operation carries.
    #[must_use]
    pub fn default_error() -> Self {
        Self {
            status: ResponseStatus::Default,
            description: "Unhandled error".to_string(),
            schema: SchemaSource::Resource(ErrorResource::shared()),
        }
    }

    /// Uses a specific resource for the body.
    #[must_use]
    pub fn with_resource(mut self, resource: ResourceRef) -> Self {
        self.schema = SchemaSource::Resource(resource);
        self
    }

    /// Declares the response as having no body.
    #[must_use]
    pub fn without_schema(mut self) -> Self {
        self.schema = SchemaSource::Omitted;
        self
    }

    /// Resource explicitly referenced by this entry.
    pub fn referenced_resource(&self) -> Option<&ResourceRef> {
        self.schema.resource()
    }

    /// Renders the entry against the operation's resolved resource.
    #[must_use]
    pub fn to_doc(&self, bound: Option<&ResourceRef>) -> (String, ResponseDoc) {
        let name = bound.map_or("Resource", |r| r.name());
        let doc = ResponseDoc {
            description: self.description.replace("{name}", name),
            schema: self.schema.resolve(bound),
        };
        (self.status.key(), doc)
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum In {
    /// URL path placeholder.
    Path,
    /// Query string.
    Query,
    /// HTTP header.
    Header,
    /// Request body.
    Body,
}

impl In {
    /// Location name as documented.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Body => "body",
        }
    }
}

/// A declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    /// Location.
    pub location: In,
    /// Name.
    pub name: String,
    /// Primitive type; unset for body parameters.
    pub param_type: Option<SchemaType>,
    /// Description.
    pub description: Option<String>,
    /// Whether the parameter must be supplied.
    pub required: bool,
    /// Value used when the parameter is absent.
    pub default: Option<Value>,
    /// Inclusive lower bound.
    pub minimum: Option<Value>,
    /// Inclusive upper bound.
    pub maximum: Option<Value>,
    /// Body schema, for body parameters.
    pub schema: SchemaSource,
}

impl Param {
    fn new(location: In, name: impl Into<String>, param_type: Option<SchemaType>) -> Self {
        Self {
            location,
            name: name.into(),
            param_type,
            description: None,
            required: false,
            default: None,
            minimum: None,
            maximum: None,
            schema: SchemaSource::Omitted,
        }
    }

    /// Optional query string parameter.
    #[must_use]
    pub fn query(name: impl Into<String>, param_type: SchemaType, description: impl Into<String>) -> Self {
        Self::new(In::Query, name, Some(param_type)).describe(description)
    }

    /// Required path parameter.
    #[must_use]
    pub fn path(name: impl Into<String>, param_type: SchemaType, description: impl Into<String>) -> Self {
        Self::new(In::Path, name, Some(param_type))
            .describe(description)
            .required(true)
    }

    /// Optional header parameter.
    #[must_use]
    pub fn header(name: impl Into<String>, param_type: SchemaType, description: impl Into<String>) -> Self {
        Self::new(In::Header, name, Some(param_type)).describe(description)
    }

    /// Required body parameter carrying the operation's resource.
    #[must_use]
    pub fn body(description: impl Into<String>) -> Self {
        let mut param = Self::new(In::Body, "body", None)
            .describe(description)
            .required(true);
        param.schema = SchemaSource::Bound;
        param
    }

    /// Sets the description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the required flag.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn minimum(mut self, value: impl Into<Value>) -> Self {
        self.minimum = Some(value.into());
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn maximum(mut self, value: impl Into<Value>) -> Self {
        self.maximum = Some(value.into());
        self
    }

    /// Uses a specific resource for a body parameter.
    #[must_use]
    pub fn with_resource(mut self, resource: ResourceRef) -> Self {
        self.schema = SchemaSource::Resource(resource);
        self
    }

    /// Identity within one operation's parameter set.
    #[must_use]
    pub fn key(&self) -> (In, String) {
        (self.location, self.name.clone())
    }

    /// Resource explicitly referenced by this parameter.
    pub fn referenced_resource(&self) -> Option<&ResourceRef> {
        self.schema.resource()
    }

    /// Renders the parameter against the operation's resolved resource.
    #[must_use]
    pub fn to_doc(&self, bound: Option<&ResourceRef>) -> ParameterDoc {
        ParameterDoc {
            name: self.name.clone(),
            location: self.location.as_str().to_string(),
            description: self.description.clone(),
            required: self.required,
            param_type: self.param_type,
            default: self.default.clone(),
            maximum: self.maximum.clone(),
            minimum: self.minimum.clone(),
            schema: self.schema.resolve(bound),
        }
    }
}

/// Documentation metadata attached to a callback.
///
/// Responses and parameters are keyed by status and by (location, name);
/// the first declaration of a key wins.
#[derive(Debug, Clone, Default)]
pub struct OperationMeta {
    /// Marks the operation as deprecated.
    pub deprecated: bool,
    /// Content types the operation accepts.
    pub consumes: IndexSet<String>,
    /// Content types the operation emits.
    pub produces: IndexSet<String>,
    /// Declared responses.
    pub responses: IndexMap<ResponseStatus, ResponseEntry>,
    /// Declared parameters.
    pub parameters: IndexMap<(In, String), Param>,
}

impl OperationMeta {
    /// Adds a response unless one with the same status is already declared.
    pub fn add_response(&mut self, entry: ResponseEntry) {
        self.responses.entry(entry.status).or_insert(entry);
    }

    /// Adds a parameter unless one with the same location and name exists.
    pub fn add_parameter(&mut self, param: Param) {
        self.parameters.entry(param.key()).or_insert(param);
    }
}

/// An operation callback together with its declared name, doc text and
/// metadata.
///
/// # Example
///
/// ```
/// use meridian_core::{Callback, Reply, ResponseEntry};
///
/// let callback = Callback::new("get_book", |_inv| Ok(Reply::Empty))
///     .doc("Fetch a single book.")
///     .produces("application/json")
///     .response(ResponseEntry::new(200, "The {name}"));
///
/// assert_eq!(callback.name(), "get_book");
/// assert_eq!(callback.meta().responses.len(), 1);
/// ```
#[derive(Clone)]
pub struct Callback {
    name: String,
    doc: Option<String>,
    meta: OperationMeta,
    func: Arc<CallbackFn>,
}

impl Callback {
    /// Wraps a function under its declared name.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Invocation<'_>) -> ApiResult<Reply> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            meta: OperationMeta::default(),
            func: Arc::new(func),
        }
    }

    /// Sets the doc text, used as the operation description.
    #[must_use]
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Some(text.into());
        self
    }

    /// Marks the operation as deprecated.
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.meta.deprecated = true;
        self
    }

    /// Declares an accepted content type.
    #[must_use]
    pub fn consumes(mut self, content_type: impl Into<String>) -> Self {
        self.meta.consumes.insert(content_type.into());
        self
    }

    /// Declares an emitted content type.
    #[must_use]
    pub fn produces(mut self, content_type: impl Into<String>) -> Self {
        self.meta.produces.insert(content_type.into());
        self
    }

    /// Declares a response.
    #[must_use]
    pub fn response(mut self, entry: ResponseEntry) -> Self {
        self.meta.add_response(entry);
        self
    }

    /// Declares a parameter.
    #[must_use]
    pub fn parameter(mut self, param: Param) -> Self {
        self.meta.add_parameter(param);
        self
    }

    /// Declared name; becomes the operation id.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Doc text, if any.
    #[must_use]
    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Metadata declared so far.
    #[must_use]
    pub fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>, OperationMeta, Arc<CallbackFn>) {
        (self.name, self.doc, self.meta, self.func)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceDef;

    fn book() -> ResourceRef {
        Arc::new(ResourceDef::new("library.Book"))
    }

    #[test]
    fn test_first_response_wins() {
        let mut meta = OperationMeta::default();
        meta.add_response(ResponseEntry::new(201, "Custom created"));
        meta.add_response(ResponseEntry::new(201, "{name} has been created"));
        assert_eq!(meta.responses.len(), 1);
        assert_eq!(meta.responses[&ResponseStatus::Code(201)].description, "Custom created");
    }

    #[test]
    fn test_response_doc_with_bound_resource() {
        let (key, doc) = ResponseEntry::new(201, "{name} has been created").to_doc(Some(&book()));
        assert_eq!(key, "201");
        assert_eq!(doc.description, "Book has been created");
        assert_eq!(doc.schema, Some(Schema::definition("library.Book")));
    }

    #[test]
    fn test_response_doc_without_resource() {
        let (_, doc) = ResponseEntry::new(200, "Get a {name}").to_doc(None);
        assert_eq!(doc.description, "Get a Resource");
        assert!(doc.schema.is_none());

        let (_, doc) = ResponseEntry::new(204, "Deleted").without_schema().to_doc(Some(&book()));
        assert!(doc.schema.is_none());
    }

    #[test]
    fn test_default_error_response() {
        let (key, doc) = ResponseEntry::default_error().to_doc(None);
        assert_eq!(key, "default");
        assert_eq!(doc.schema, Some(Schema::definition("Error")));
    }

    #[test]
    fn test_body_param_doc() {
        let doc = Param::body("Expected resource supplied with request.").to_doc(Some(&book()));
        assert_eq!(doc.location, "body");
        assert!(doc.required);
        assert!(doc.param_type.is_none());
        assert_eq!(doc.schema, Some(Schema::definition("library.Book")));
    }

    #[test]
    fn test_query_param_doc() {
        let doc = Param::query("limit", SchemaType::Integer, "Page size")
            .default_value(50)
            .maximum(100)
            .to_doc(None);
        assert!(!doc.required);
        assert_eq!(doc.default, Some(serde_json::json!(50)));
        assert_eq!(doc.maximum, Some(serde_json::json!(100)));
        assert!(doc.schema.is_none());
    }

    #[test]
    fn test_callback_metadata() {
        let callback = Callback::new("list_books", |_| Ok(Reply::Empty))
            .deprecated()
            .consumes("application/json")
            .parameter(Param::header("X-Trace", SchemaType::String, "Trace id"));
        assert!(callback.meta().deprecated);
        assert_eq!(callback.meta().consumes.len(), 1);
        assert_eq!(callback.meta().parameters.len(), 1);
        assert!(callback.doc_text().is_none());
    }
}
