//! Operation descriptors.
//!
//! An [`Operation`] wraps a [`Callback`] with the path suffix and methods it
//! is exposed at, its parameter and response metadata, and optional dispatch
//! hooks. Behavioural variants are expressed through [`OperationKind`]:
//!
//! - [`OperationKind::Plain`] invokes the callback as is.
//! - [`OperationKind::Listing`] reads pagination from the query string and
//!   wraps results in a [`Listing`] envelope.
//! - [`OperationKind::ResourceBody`] decodes the request body into the
//!   operation's resource and passes it as the first positional argument.
//!
//! Operations are built once during registration and are immutable after
//! that, except for the one-shot binding to an owner and the resolve-once
//! resource cell.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use http::Method;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::binding::{Binding, PostDispatch, PreDispatch};
use crate::doc::{OperationDoc, SchemaType};
use crate::error::{ApiError, ApiResult};
use crate::meta::{Callback, CallbackFn, OperationMeta, Param, ResponseEntry};
use crate::path::UrlPath;
use crate::reply::{Listing, Reply};
use crate::request::{to_bool, Request};
use crate::resource::ResourceRef;
use crate::sequence::Sequence;

/// Keyword arguments passed to a callback, usually captured path segments.
pub type PathArgs = IndexMap<String, Value>;

/// A final path paired with the operation served there.
pub type OperationPath<'a> = (UrlPath, &'a Operation);

/// Everything a callback receives for one execution.
pub struct Invocation<'a> {
    /// The owner the operation is bound to, if any.
    pub owner: Option<Arc<dyn Binding>>,
    /// The request being served.
    pub request: &'a dyn Request,
    /// Positional arguments. Resource-body operations put the decoded body first.
    pub args: Vec<Value>,
    /// Keyword arguments. Listing operations add `offset` and `limit`.
    pub path_args: PathArgs,
}

impl Invocation<'_> {
    /// Returns the owner as its concrete type.
    #[must_use]
    pub fn owner<T: Binding>(&self) -> Option<&T> {
        self.owner.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Looks up a keyword argument.
    #[must_use]
    pub fn path_arg(&self, name: &str) -> Option<&Value> {
        self.path_args.get(name)
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("bound", &self.owner.is_some())
            .field("args", &self.args)
            .field("path_args", &self.path_args)
            .finish_non_exhaustive()
    }
}

/// Pagination settings of a listing operation.
///
/// A cap of zero is treated as "no cap".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Offset used when the query string has none.
    pub default_offset: u64,
    /// Limit used when the query string has none.
    pub default_limit: u64,
    /// Largest accepted offset.
    pub max_offset: Option<u64>,
    /// Largest accepted limit.
    pub max_limit: Option<u64>,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            default_offset: 0,
            default_limit: 50,
            max_offset: None,
            max_limit: None,
        }
    }
}

impl ListingOptions {
    /// Creates options with the given defaults and no caps.
    #[must_use]
    pub const fn new(default_offset: u64, default_limit: u64) -> Self {
        Self {
            default_offset,
            default_limit,
            max_offset: None,
            max_limit: None,
        }
    }

    /// Caps the offset.
    #[must_use]
    pub const fn max_offset(mut self, max_offset: u64) -> Self {
        self.max_offset = if max_offset == 0 { None } else { Some(max_offset) };
        self
    }

    /// Caps the limit.
    #[must_use]
    pub const fn max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = if max_limit == 0 { None } else { Some(max_limit) };
        self
    }

    /// Normalises requested values into range.
    ///
    /// # Example
    ///
    /// ```
    /// use meridian_core::ListingOptions;
    ///
    /// let options = ListingOptions::new(0, 20).max_limit(100);
    /// assert_eq!(options.clamp(-5, 0), (0, 1));
    /// assert_eq!(options.clamp(10, 500), (10, 100));
    /// ```
    #[must_use]
    pub fn clamp(&self, offset: i64, limit: i64) -> (u64, u64) {
        let mut offset = u64::try_from(offset).unwrap_or(0);
        if let Some(max) = self.max_offset {
            offset = offset.min(max);
        }
        let mut limit = u64::try_from(limit).unwrap_or(0).max(1);
        if let Some(max) = self.max_limit {
            limit = limit.min(max);
        }
        (offset, limit)
    }

    fn parameters(&self) -> [Param; 3] {
        let mut offset = Param::query("offset", SchemaType::Integer, "Offset to start listing from.")
            .default_value(self.default_offset);
        if let Some(max) = self.max_offset {
            offset = offset.maximum(max);
        }
        let mut limit = Param::query("limit", SchemaType::Integer, "Limit on the number of listings returned.")
            .default_value(self.default_limit);
        if let Some(max) = self.max_limit {
            limit = limit.maximum(max);
        }
        let bare = Param::query("bare", SchemaType::Boolean, "Return a plain list of objects.");
        [offset, limit, bare]
    }
}

/// Behavioural variant of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationKind {
    /// Invoke the callback directly.
    #[default]
    Plain,
    /// Paginated listing.
    Listing(ListingOptions),
    /// Decode the request body and pass it first.
    ResourceBody,
}

struct Bound {
    owner: Weak<dyn Binding>,
    pre_dispatch: Option<PreDispatch>,
    post_dispatch: Option<PostDispatch>,
}

/// A callback exposed at a path for a set of methods.
pub struct Operation {
    operation_id: String,
    description: Option<String>,
    func: Arc<CallbackFn>,
    url_path: UrlPath,
    methods: IndexSet<Method>,
    kind: OperationKind,
    resource: Option<ResourceRef>,
    sort_key: u64,
    summary: Option<String>,
    tags: IndexSet<String>,
    meta: OperationMeta,
    pre_dispatch: Option<PreDispatch>,
    post_dispatch: Option<PostDispatch>,
    binding: OnceLock<Bound>,
    resolved_resource: OnceLock<Option<ResourceRef>>,
}

impl Operation {
    /// Starts building an operation around `callback`.
    #[must_use]
    pub fn builder(callback: Callback) -> OperationBuilder {
        OperationBuilder::new(callback)
    }

    /// Identifier derived from the callback's declared name.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Callback doc text.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Path suffix relative to the owning container.
    #[must_use]
    pub fn url_path(&self) -> &UrlPath {
        &self.url_path
    }

    /// Methods the operation answers.
    #[must_use]
    pub fn methods(&self) -> &IndexSet<Method> {
        &self.methods
    }

    /// Behavioural variant.
    #[must_use]
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Creation-order key, unique per sequence.
    #[must_use]
    pub fn sort_key(&self) -> u64 {
        self.sort_key
    }

    /// Summary text.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Merged documentation metadata.
    #[must_use]
    pub fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    /// Whether the operation has been bound to an owner.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    /// The owner, while it is alive.
    #[must_use]
    pub fn owner(&self) -> Option<Arc<dyn Binding>> {
        self.binding.get().and_then(|bound| bound.owner.upgrade())
    }

    /// Binds the operation to `owner`.
    ///
    /// Binding is one-shot. Binding again to the same owner is a no-op;
    /// binding to a different owner fails and leaves the first binding in
    /// place. Hooks the operation does not carry itself are taken from the
    /// owner.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when already bound elsewhere.
    pub fn bind_to(&self, owner: &Arc<dyn Binding>) -> ApiResult<()> {
        let weak = Arc::downgrade(owner);
        let bound = Bound {
            owner: weak.clone(),
            pre_dispatch: owner.pre_dispatch(),
            post_dispatch: owner.post_dispatch(),
        };

        if self.binding.set(bound).is_ok() {
            debug!(operation_id = %self.operation_id, sort_key = self.sort_key, "operation bound");
            return Ok(());
        }

        match self.binding.get() {
            Some(existing) if Weak::ptr_eq(&existing.owner, &weak) => Ok(()),
            _ => {
                warn!(operation_id = %self.operation_id, "rejected rebinding to a different owner");
                Err(ApiError::configuration(format!(
                    "operation `{}` is already bound to another owner",
                    self.operation_id
                )))
            }
        }
    }

    /// Resource of the operation: the explicit one, else the owner's.
    ///
    /// Resolved on first access and cached; a lookup made before binding
    /// caches the absent result and later binding does not invalidate it.
    #[must_use]
    pub fn resource(&self) -> Option<ResourceRef> {
        self.resolved_resource
            .get_or_init(|| {
                self.resource
                    .clone()
                    .or_else(|| self.owner().and_then(|owner| owner.resource()))
            })
            .clone()
    }

    /// Own tags followed by the owner's tags, computed on each call.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        if let Some(owner) = self.owner() {
            tags.extend(owner.tags());
        }
        tags.into_iter().collect()
    }

    /// Resources this operation refers to, for schema definitions.
    #[must_use]
    pub fn referenced_resources(&self) -> Vec<ResourceRef> {
        let responses = self.meta.responses.values().filter_map(ResponseEntry::referenced_resource);
        let parameters = self.meta.parameters.values().filter_map(Param::referenced_resource);
        self.resource()
            .into_iter()
            .chain(responses.chain(parameters).cloned())
            .collect()
    }

    /// The single `(final path, operation)` pair for this operation.
    pub fn operation_paths(&self, prefix: Option<&UrlPath>) -> impl Iterator<Item = OperationPath<'_>> {
        let path = prefix.map_or_else(|| self.url_path.clone(), |prefix| prefix + &self.url_path);
        std::iter::once((path, self))
    }

    /// Runs the pre-dispatch hook, [`execute`](Self::execute), then the
    /// post-dispatch hook.
    ///
    /// # Errors
    ///
    /// Propagates errors from the hooks and the callback.
    pub fn dispatch(&self, request: &dyn Request, mut path_args: PathArgs) -> ApiResult<Reply> {
        trace!(operation_id = %self.operation_id, "dispatching");
        let bound = self.binding.get();

        let pre = self
            .pre_dispatch
            .as_ref()
            .or_else(|| bound.and_then(|b| b.pre_dispatch.as_ref()));
        if let Some(hook) = pre {
            hook(request, &mut path_args)?;
        }

        let reply = self.execute(request, Vec::new(), path_args)?;

        let post = self
            .post_dispatch
            .as_ref()
            .or_else(|| bound.and_then(|b| b.post_dispatch.as_ref()));
        match post {
            Some(hook) => hook(request, reply),
            None => Ok(reply),
        }
    }

    /// Invokes the callback, shaped by the operation kind.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for non-integer `offset`/`limit` on
    /// listings, and propagates body decoding and callback errors.
    pub fn execute(&self, request: &dyn Request, mut args: Vec<Value>, path_args: PathArgs) -> ApiResult<Reply> {
        match self.kind {
            OperationKind::Plain => self.invoke(request, args, path_args),
            OperationKind::Listing(options) => self.execute_listing(&options, request, args, path_args),
            OperationKind::ResourceBody => {
                let body = match self.resource() {
                    Some(resource) => request.deserialize(resource.as_ref())?,
                    None => Value::Null,
                };
                args.insert(0, body);
                self.invoke(request, args, path_args)
            }
        }
    }

    fn execute_listing(
        &self,
        options: &ListingOptions,
        request: &dyn Request,
        args: Vec<Value>,
        mut path_args: PathArgs,
    ) -> ApiResult<Reply> {
        let offset = query_int(request, "offset", options.default_offset)?;
        let limit = query_int(request, "limit", options.default_limit)?;
        let (offset, limit) = options.clamp(offset, limit);
        let bare = request.query_param("bare").is_some_and(to_bool);
        trace!(operation_id = %self.operation_id, offset, limit, bare, "listing");

        path_args.insert("offset".to_string(), offset.into());
        path_args.insert("limit".to_string(), limit.into());

        let (results, total_count) = match self.invoke(request, args, path_args)? {
            Reply::Value(results) => (results, None),
            Reply::WithTotal(results, total) => (results, Some(total)),
            other => return Ok(other),
        };

        if bare {
            Ok(Reply::Value(results))
        } else {
            Ok(Reply::Listing(Listing {
                results,
                limit,
                offset,
                total_count,
            }))
        }
    }

    fn invoke(&self, request: &dyn Request, args: Vec<Value>, path_args: PathArgs) -> ApiResult<Reply> {
        let invocation = Invocation {
            owner: self.owner(),
            request,
            args,
            path_args,
        };
        (self.func)(invocation)
    }

    /// Renders the documentation object for this operation.
    #[must_use]
    pub fn to_documentation(&self) -> OperationDoc {
        let resource = self.resource();
        let resource = resource.as_ref();
        OperationDoc {
            operation_id: self.operation_id.clone(),
            description: self.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
            summary: self.summary.clone(),
            tags: self.tags(),
            deprecated: self.meta.deprecated,
            consumes: self.meta.consumes.iter().cloned().collect(),
            parameters: self.meta.parameters.values().map(|p| p.to_doc(resource)).collect(),
            produces: self.meta.produces.iter().cloned().collect(),
            responses: self.meta.responses.values().map(|r| r.to_doc(resource)).collect(),
        }
    }
}

fn query_int(request: &dyn Request, name: &str, default: u64) -> ApiResult<i64> {
    match request.query_param(name) {
        None => Ok(i64::try_from(default).unwrap_or(i64::MAX)),
        Some(raw) => {
            let raw = raw.trim();
            raw.parse::<i64>().or_else(|_| {
                saturated_int(raw)
                    .ok_or_else(|| ApiError::validation(format!("query parameter `{name}` must be an integer")))
            })
        }
    }
}

/// Integers too large for `i64` saturate so they can still be clamped.
fn saturated_int(raw: &str) -> Option<i64> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("operation_id", &self.operation_id)
            .field("url_path", &self.url_path.render())
            .field("methods", &self.methods)
            .field("kind", &self.kind)
            .field("sort_key", &self.sort_key)
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Operation`].
///
/// # Example
///
/// ```
/// use http::Method;
/// use meridian_core::{Callback, Operation, Reply, UrlPath};
///
/// let op = Operation::builder(Callback::new("publish", |_| Ok(Reply::Empty)))
///     .path(UrlPath::parse("{book_id:int}/publish"))
///     .method(Method::POST)
///     .tag("books")
///     .build();
///
/// assert_eq!(op.url_path().render(), "{book_id}/publish");
/// assert!(op.methods().contains(&Method::POST));
/// ```
#[must_use]
pub struct OperationBuilder {
    callback: Callback,
    url_path: UrlPath,
    methods: IndexSet<Method>,
    kind: OperationKind,
    resource: Option<ResourceRef>,
    tags: IndexSet<String>,
    summary: Option<String>,
    pre_dispatch: Option<PreDispatch>,
    post_dispatch: Option<PostDispatch>,
    extra: OperationMeta,
}

impl OperationBuilder {
    fn new(callback: Callback) -> Self {
        Self {
            callback,
            url_path: UrlPath::new(),
            methods: IndexSet::new(),
            kind: OperationKind::Plain,
            resource: None,
            tags: IndexSet::new(),
            summary: None,
            pre_dispatch: None,
            post_dispatch: None,
            extra: OperationMeta::default(),
        }
    }

    /// Sets the path suffix.
    pub fn path(mut self, path: impl Into<UrlPath>) -> Self {
        self.url_path = path.into();
        self
    }

    /// Replaces the method set. An empty set falls back to `GET`.
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Adds a method.
    pub fn method(mut self, method: Method) -> Self {
        self.methods.insert(method);
        self
    }

    /// Sets the behavioural variant.
    pub fn kind(mut self, kind: OperationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the explicit resource.
    pub fn resource(mut self, resource: ResourceRef) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Adds a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Adds several tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets the summary.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets an own pre-dispatch hook, taking precedence over the owner's.
    pub fn pre_dispatch<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn Request, &mut PathArgs) -> ApiResult<()> + Send + Sync + 'static,
    {
        self.pre_dispatch = Some(Arc::new(hook));
        self
    }

    /// Sets an own post-dispatch hook, taking precedence over the owner's.
    pub fn post_dispatch<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn Request, Reply) -> ApiResult<Reply> + Send + Sync + 'static,
    {
        self.post_dispatch = Some(Arc::new(hook));
        self
    }

    /// Declares a response. Callback metadata for the same status wins.
    pub fn response(mut self, entry: ResponseEntry) -> Self {
        self.extra.add_response(entry);
        self
    }

    /// Declares a parameter. Callback metadata for the same key wins.
    pub fn parameter(mut self, param: Param) -> Self {
        self.extra.add_parameter(param);
        self
    }

    /// Builds the operation, taking its sort key from the process-wide sequence.
    #[must_use]
    pub fn build(self) -> Operation {
        self.build_with(Sequence::global())
    }

    /// Builds the operation, taking its sort key from `sequence`.
    #[must_use]
    pub fn build_with(self, sequence: &Sequence) -> Operation {
        let (operation_id, description, mut meta, func) = self.callback.into_parts();

        meta.add_response(ResponseEntry::default_error());
        let OperationMeta {
            deprecated,
            consumes,
            produces,
            responses,
            parameters,
        } = self.extra;
        meta.deprecated |= deprecated;
        meta.consumes.extend(consumes);
        meta.produces.extend(produces);
        for entry in responses.into_values() {
            meta.add_response(entry);
        }
        for param in parameters.into_values() {
            meta.add_parameter(param);
        }

        match &self.kind {
            OperationKind::Plain => {}
            OperationKind::Listing(options) => {
                for param in options.parameters() {
                    meta.add_parameter(param);
                }
            }
            OperationKind::ResourceBody => {
                meta.add_parameter(Param::body("Expected resource supplied with request."));
            }
        }

        let mut methods = self.methods;
        if methods.is_empty() {
            methods.insert(Method::GET);
        }

        let sort_key = sequence.next_key();
        debug!(
            operation_id = %operation_id,
            sort_key,
            path = %self.url_path,
            "operation registered"
        );

        Operation {
            operation_id,
            description,
            func,
            url_path: self.url_path,
            methods,
            kind: self.kind,
            resource: self.resource,
            sort_key,
            summary: self.summary,
            tags: self.tags,
            meta,
            pre_dispatch: self.pre_dispatch,
            post_dispatch: self.post_dispatch,
            binding: OnceLock::new(),
            resolved_resource: OnceLock::new(),
        }
    }
}
