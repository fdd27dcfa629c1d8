//! Containers that group operations into a prefixed tree.
//!
//! Anything that holds operations implements [`OperationSource`], which
//! flattens it into `(final path, operation)` pairs in registration order.
//! Two containers are provided:
//!
//! - [`ResourceApi`] owns the operations of one resource. It is the
//!   [`Binding`] target of those operations, supplying the fallback resource,
//!   tags and dispatch hooks.
//! - [`ApiContainer`] groups other sources under a path prefix, optionally
//!   as a numbered API version. The outermost container is usually built
//!   with [`ApiContainer::interface`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use meridian_core::{shortcuts, ApiContainer, Callback, OperationSource, Reply, ResourceApi, ResourceDef};
//!
//! let books = ResourceApi::builder(Arc::new(ResourceDef::new("library.Book")))
//!     .operation(shortcuts::detail(Callback::new("get_book", |_| Ok(Reply::Empty))).build())
//!     .build()
//!     .unwrap();
//!
//! let v1 = ApiContainer::version(1).add(books).build().unwrap();
//! let root = ApiContainer::interface().add(v1).build().unwrap();
//!
//! let paths: Vec<String> = root.operation_paths(None).map(|(p, _)| p.render()).collect();
//! assert_eq!(paths, vec!["/api/v1/book/{resource_id}"]);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use tracing::{debug, warn};

use crate::binding::{Binding, PostDispatch, PreDispatch};
use crate::error::{ApiError, ApiResult};
use crate::operation::{Operation, OperationPath, PathArgs};
use crate::path::UrlPath;
use crate::reply::Reply;
use crate::request::Request;
use crate::resource::ResourceRef;

/// A lazily flattened sequence of operations.
pub type OperationPaths<'a> = Box<dyn Iterator<Item = OperationPath<'a>> + 'a>;

/// Anything that holds operations.
pub trait OperationSource: Send + Sync {
    /// Yields every operation with its final path, `prefix` first.
    ///
    /// Implementations must not retain `prefix`; the iterator only borrows
    /// `self`.
    fn operation_paths<'a>(&'a self, prefix: Option<&UrlPath>) -> OperationPaths<'a>;

    /// Records the container this source was added to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when the source already belongs to
    /// a different container.
    fn attach_to(&self, _parent: &Weak<ApiContainer>) -> ApiResult<()> {
        Ok(())
    }

    /// True once [`attach_to`](Self::attach_to) has recorded a parent.
    fn is_attached(&self) -> bool {
        false
    }
}

impl OperationSource for Operation {
    fn operation_paths<'a>(&'a self, prefix: Option<&UrlPath>) -> OperationPaths<'a> {
        Box::new(Operation::operation_paths(self, prefix))
    }
}

/// One-shot link from a source to the container holding it.
#[derive(Default)]
pub struct ParentLink(OnceLock<Weak<ApiContainer>>);

impl ParentLink {
    /// Creates an unattached link.
    #[must_use]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Records `parent`. Attaching again to the same container is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when already attached elsewhere.
    pub fn attach(&self, parent: &Weak<ApiContainer>, child: &str) -> ApiResult<()> {
        if self.0.set(parent.clone()).is_ok() {
            return Ok(());
        }
        match self.0.get() {
            Some(existing) if Weak::ptr_eq(existing, parent) => Ok(()),
            _ => {
                warn!(child, "rejected attaching to a second parent container");
                Err(ApiError::configuration(format!(
                    "`{child}` is already attached to another container"
                )))
            }
        }
    }

    /// True once a parent has been recorded, even if it was dropped since.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.0.get().is_some()
    }

    /// The parent container, while it is alive.
    #[must_use]
    pub fn get(&self) -> Option<Arc<ApiContainer>> {
        self.0.get().and_then(Weak::upgrade)
    }
}

impl fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParentLink").field(&self.0.get().is_some()).finish()
    }
}

/// The operations of a single resource, bound to this container.
pub struct ResourceApi {
    api_name: String,
    resource: ResourceRef,
    tags: Vec<String>,
    path_prefix: UrlPath,
    operations: Vec<Arc<Operation>>,
    pre_dispatch: Option<PreDispatch>,
    post_dispatch: Option<PostDispatch>,
    state: Option<Arc<dyn Any + Send + Sync>>,
    parent: ParentLink,
}

impl ResourceApi {
    /// Starts building an API for `resource`.
    #[must_use]
    pub fn builder(resource: ResourceRef) -> ResourceApiBuilder {
        ResourceApiBuilder {
            resource,
            api_name: None,
            tags: Vec::new(),
            path_prefix: UrlPath::new(),
            operations: Vec::new(),
            pre_dispatch: None,
            post_dispatch: None,
            state: None,
        }
    }

    /// Name of the API, the last segment of its path prefix.
    #[must_use]
    pub fn api_name(&self) -> &str {
        &self.api_name
    }

    /// Path prefix of every operation, ending with the API name.
    #[must_use]
    pub fn path_prefix(&self) -> &UrlPath {
        &self.path_prefix
    }

    /// Operations ordered by sort key.
    #[must_use]
    pub fn operations(&self) -> &[Arc<Operation>] {
        &self.operations
    }

    /// Looks up an operation by id.
    #[must_use]
    pub fn operation(&self, operation_id: &str) -> Option<&Arc<Operation>> {
        self.operations.iter().find(|op| op.operation_id() == operation_id)
    }

    /// User state attached at build time.
    #[must_use]
    pub fn state<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.state.as_deref()?.downcast_ref::<T>()
    }

    /// The container this API was added to.
    #[must_use]
    pub fn parent(&self) -> Option<Arc<ApiContainer>> {
        self.parent.get()
    }
}

impl Binding for ResourceApi {
    fn resource(&self) -> Option<ResourceRef> {
        Some(Arc::clone(&self.resource))
    }

    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    fn pre_dispatch(&self) -> Option<PreDispatch> {
        self.pre_dispatch.clone()
    }

    fn post_dispatch(&self) -> Option<PostDispatch> {
        self.post_dispatch.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl OperationSource for ResourceApi {
    fn operation_paths<'a>(&'a self, prefix: Option<&UrlPath>) -> OperationPaths<'a> {
        let base = prefix.map_or_else(|| self.path_prefix.clone(), |p| p + &self.path_prefix);
        Box::new(
            self.operations
                .iter()
                .flat_map(move |op| Operation::operation_paths(&**op, Some(&base))),
        )
    }

    fn attach_to(&self, parent: &Weak<ApiContainer>) -> ApiResult<()> {
        self.parent.attach(parent, &self.api_name)
    }

    fn is_attached(&self) -> bool {
        self.parent.is_attached()
    }
}

impl fmt::Debug for ResourceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceApi")
            .field("api_name", &self.api_name)
            .field("resource", &self.resource.resource_name())
            .field("path_prefix", &self.path_prefix.render())
            .field("operations", &self.operations.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ResourceApi`].
#[must_use]
pub struct ResourceApiBuilder {
    resource: ResourceRef,
    api_name: Option<String>,
    tags: Vec<String>,
    path_prefix: UrlPath,
    operations: Vec<Operation>,
    pre_dispatch: Option<PreDispatch>,
    post_dispatch: Option<PostDispatch>,
    state: Option<Arc<dyn Any + Send + Sync>>,
}

impl ResourceApiBuilder {
    /// Overrides the API name; defaults to the lower-cased resource name.
    pub fn api_name(mut self, name: impl Into<String>) -> Self {
        self.api_name = Some(name.into());
        self
    }

    /// Adds a tag applied to every operation.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets a prefix placed before the API name.
    pub fn path_prefix(mut self, prefix: impl Into<UrlPath>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Adds an operation.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Pre-dispatch hook for operations without their own.
    pub fn pre_dispatch<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn Request, &mut PathArgs) -> ApiResult<()> + Send + Sync + 'static,
    {
        self.pre_dispatch = Some(Arc::new(hook));
        self
    }

    /// Post-dispatch hook for operations without their own.
    pub fn post_dispatch<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn Request, Reply) -> ApiResult<Reply> + Send + Sync + 'static,
    {
        self.post_dispatch = Some(Arc::new(hook));
        self
    }

    /// Attaches user state, reachable from callbacks through the owner.
    pub fn state<T: Any + Send + Sync>(mut self, state: T) -> Self {
        self.state = Some(Arc::new(state));
        self
    }

    /// Builds the API and binds every operation to it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if an operation is already bound
    /// to another owner.
    pub fn build(self) -> ApiResult<Arc<ResourceApi>> {
        let api_name = self
            .api_name
            .unwrap_or_else(|| self.resource.name().to_lowercase());
        let path_prefix = self.path_prefix + UrlPath::literal(api_name.clone());

        let mut operations = self.operations;
        operations.sort_by_key(Operation::sort_key);

        let api = Arc::new(ResourceApi {
            api_name,
            resource: self.resource,
            tags: self.tags,
            path_prefix,
            operations: operations.into_iter().map(Arc::new).collect(),
            pre_dispatch: self.pre_dispatch,
            post_dispatch: self.post_dispatch,
            state: self.state,
            parent: ParentLink::new(),
        });

        let owner: Arc<dyn Binding> = api.clone();
        for operation in &api.operations {
            operation.bind_to(&owner)?;
        }

        debug!(
            api_name = %api.api_name,
            operations = api.operations.len(),
            "resource api built"
        );
        Ok(api)
    }
}

/// A named, prefixed group of operation sources.
pub struct ApiContainer {
    name: Option<String>,
    path_prefix: UrlPath,
    version: Option<u32>,
    children: Vec<Arc<dyn OperationSource>>,
    parent: ParentLink,
}

impl ApiContainer {
    /// Starts building an unnamed container with an empty prefix.
    #[must_use]
    pub fn builder() -> ApiContainerBuilder {
        ApiContainerBuilder {
            name: None,
            path_prefix: UrlPath::new(),
            version: None,
            children: Vec::new(),
            require_absolute: false,
        }
    }

    /// Starts building a container whose prefix is its name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> ApiContainerBuilder {
        let name = name.into();
        let path_prefix = UrlPath::parse(&name);
        ApiContainerBuilder {
            name: Some(name),
            path_prefix,
            ..Self::builder()
        }
    }

    /// Starts building the collection for API version `version`, named `v{version}`.
    #[must_use]
    pub fn version(version: u32) -> ApiContainerBuilder {
        let mut builder = Self::named(format!("v{version}"));
        builder.version = Some(version);
        builder
    }

    /// Starts building the outermost container, mounted at `/api`.
    ///
    /// Its prefix must stay absolute.
    #[must_use]
    pub fn interface() -> ApiContainerBuilder {
        let mut builder = Self::named("api");
        builder.path_prefix = UrlPath::from_literals(["", "api"]);
        builder.require_absolute = true;
        builder
    }

    /// Container name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Own path prefix.
    #[must_use]
    pub fn path_prefix(&self) -> &UrlPath {
        &self.path_prefix
    }

    /// Own API version.
    #[must_use]
    pub fn api_version(&self) -> Option<u32> {
        self.version
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &[Arc<dyn OperationSource>] {
        &self.children
    }

    /// The container this one was added to.
    #[must_use]
    pub fn parent(&self) -> Option<Arc<Self>> {
        self.parent.get()
    }

    /// Prefixes of all ancestors followed by this container's own.
    #[must_use]
    pub fn full_path(&self) -> UrlPath {
        let mut path = self.path_prefix.clone();
        let mut current = self.parent();
        while let Some(container) = current {
            path = container.path_prefix() + &path;
            current = container.parent();
        }
        path
    }

    /// Version of this container or of the nearest versioned ancestor.
    #[must_use]
    pub fn nearest_version(&self) -> Option<u32> {
        if self.version.is_some() {
            return self.version;
        }
        let mut current = self.parent();
        while let Some(container) = current {
            if container.version.is_some() {
                return container.version;
            }
            current = container.parent();
        }
        None
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.path_prefix.render())
    }
}

impl OperationSource for ApiContainer {
    fn operation_paths<'a>(&'a self, prefix: Option<&UrlPath>) -> OperationPaths<'a> {
        let base = prefix.map_or_else(|| self.path_prefix.clone(), |p| p + &self.path_prefix);
        Box::new(
            self.children
                .iter()
                .flat_map(move |child| child.operation_paths(Some(&base))),
        )
    }

    fn attach_to(&self, parent: &Weak<ApiContainer>) -> ApiResult<()> {
        self.parent.attach(parent, &self.label())
    }

    fn is_attached(&self) -> bool {
        self.parent.is_attached()
    }
}

impl fmt::Debug for ApiContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContainer")
            .field("name", &self.name)
            .field("path_prefix", &self.path_prefix.render())
            .field("version", &self.version)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiContainer`].
#[must_use]
pub struct ApiContainerBuilder {
    name: Option<String>,
    path_prefix: UrlPath,
    version: Option<u32>,
    children: Vec<Arc<dyn OperationSource>>,
    require_absolute: bool,
}

impl ApiContainerBuilder {
    /// Overrides the path prefix.
    pub fn path_prefix(mut self, prefix: impl Into<UrlPath>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Adds a child source.
    pub fn add(mut self, source: Arc<dyn OperationSource>) -> Self {
        self.children.push(source);
        self
    }

    /// Adds a free-standing operation.
    pub fn operation(self, operation: Operation) -> Self {
        self.add(Arc::new(operation))
    }

    /// Builds the container and attaches every child to it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when an interface prefix is not
    /// absolute or a child already belongs to another container.
    pub fn build(self) -> ApiResult<Arc<ApiContainer>> {
        if self.require_absolute && !self.path_prefix.is_absolute() {
            return Err(ApiError::configuration(format!(
                "path prefix `{}` must be absolute (start with '/')",
                self.path_prefix
            )));
        }

        // Nothing is attached unless every child is free.
        if let Some(index) = self.children.iter().position(|child| child.is_attached()) {
            warn!(index, "rejected container build with an already attached child");
            return Err(ApiError::configuration(format!(
                "child {index} is already attached to another container"
            )));
        }

        let container = Arc::new(ApiContainer {
            name: self.name,
            path_prefix: self.path_prefix,
            version: self.version,
            children: self.children,
            parent: ParentLink::new(),
        });

        let weak = Arc::downgrade(&container);
        for child in &container.children {
            child.attach_to(&weak)?;
        }

        debug!(
            name = container.name.as_deref().unwrap_or_default(),
            path = %container.path_prefix,
            children = container.children.len(),
            "api container built"
        );
        Ok(container)
    }
}
