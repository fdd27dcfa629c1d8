//! The `swagger` container.
//!
//! [`SwaggerSpec`] is an operation source that, once added to an
//! [`ApiContainer`], documents every operation of that container (itself
//! included) as a Swagger 2.0 document. It can optionally serve the Swagger
//! UI page and its static assets.
//!
//! ## Usage
//!
//! ```
//! use meridian_core::fixtures::{self, MockRequest};
//! use meridian_core::{ApiContainer, PathArgs, Reply};
//! use meridian_docs::SwaggerSpec;
//!
//! let swagger = SwaggerSpec::builder("Library").build().unwrap();
//! let v1 = ApiContainer::version(1)
//!     .add(fixtures::library_api().unwrap())
//!     .add(swagger.clone())
//!     .build()
//!     .unwrap();
//!
//! let reply = swagger
//!     .operation("get_swagger")
//!     .unwrap()
//!     .dispatch(&MockRequest::get().with_host("books.example.com"), PathArgs::new())
//!     .unwrap();
//!
//! let Reply::Value(document) = reply else { unreachable!() };
//! assert_eq!(document["info"]["version"], "1");
//! assert!(document["paths"]["/book"]["get"].is_object());
//! # drop(v1);
//! ```

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, Weak};

use bytes::Bytes;
use http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use meridian_core::{
    ApiContainer, ApiError, ApiResult, Binding, Callback, Invocation, Operation, OperationPaths,
    OperationSource, ParentLink, RawResponse, Reply, Request, ResponseEntry, UrlPath,
};
use serde_json::Value;
use tracing::debug;

use crate::assets::StaticAssets;
use crate::document::SwaggerDocument;
use crate::error::ASSET_NOT_FOUND_CODE;
use crate::generator::SwaggerGenerator;

/// Tag carried by every operation of the container.
pub const SWAGGER_TAG: &str = "swagger";

/// Error code returned while the container is not attached to a parent.
pub const SWAGGER_UNAVAILABLE_CODE: u32 = 40442;

const UI_PAGE: &str = "ui.html";
const PATH_PLACEHOLDER: &str = "{{SWAGGER_PATH}}";
const STATIC_CACHE_CONTROL: &str = "public, max-age=300";

fn detached() -> ApiError {
    ApiError::not_found_with_code("Swagger not available.", SWAGGER_UNAVAILABLE_CODE)
        .with_developer_message("Swagger API is detached from a parent container.")
}

fn asset_not_found() -> ApiError {
    ApiError::not_found_with_code("Not found", ASSET_NOT_FOUND_CODE)
}

/// Content type served for a UI asset, by file extension.
fn asset_content_type(file_name: &str) -> Option<&'static str> {
    match Path::new(file_name).extension()?.to_str()? {
        "css" => Some("text/css"),
        "js" => Some("application/javascript"),
        _ => None,
    }
}

fn owner<'a>(invocation: &'a Invocation<'_>) -> ApiResult<&'a SwaggerSpec> {
    invocation.owner::<SwaggerSpec>().ok_or_else(detached)
}

/// Container that publishes the Swagger document of its parent.
pub struct SwaggerSpec {
    title: String,
    enable_ui: bool,
    host: Option<String>,
    schemes: Vec<String>,
    content_types: Vec<String>,
    strip_segments: Option<usize>,
    assets: StaticAssets,
    path_prefix: UrlPath,
    operations: Vec<Arc<Operation>>,
    parent: ParentLink,
    ui_cache: OnceLock<String>,
}

impl SwaggerSpec {
    /// Starts building a container for an API titled `title`.
    #[must_use]
    pub fn builder(title: impl Into<String>) -> SwaggerSpecBuilder {
        SwaggerSpecBuilder {
            title: title.into(),
            enable_ui: false,
            host: None,
            schemes: Vec::new(),
            content_types: vec!["application/json".to_string()],
            strip_segments: None,
            assets: StaticAssets::bundled(),
        }
    }

    /// API title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the UI operations are registered.
    #[must_use]
    pub const fn ui_enabled(&self) -> bool {
        self.enable_ui
    }

    /// The asset directory used for the UI.
    #[must_use]
    pub const fn assets(&self) -> &StaticAssets {
        &self.assets
    }

    /// Operations of this container.
    #[must_use]
    pub fn operations(&self) -> &[Arc<Operation>] {
        &self.operations
    }

    /// Looks up an operation by id.
    #[must_use]
    pub fn operation(&self, operation_id: &str) -> Option<&Arc<Operation>> {
        self.operations.iter().find(|op| op.operation_id() == operation_id)
    }

    /// The container this was added to.
    #[must_use]
    pub fn parent(&self) -> Option<Arc<ApiContainer>> {
        self.parent.get()
    }

    /// Prefixes of the parent and all its ancestors. Empty when detached.
    #[must_use]
    pub fn base_path(&self) -> UrlPath {
        self.parent().map(|parent| parent.full_path()).unwrap_or_default()
    }

    /// Path of the Swagger JSON operation.
    #[must_use]
    pub fn swagger_path(&self) -> UrlPath {
        self.base_path() + &self.path_prefix
    }

    /// Generator configured for `parent` and `request`.
    fn generator(&self, parent: &ApiContainer, request: &dyn Request) -> SwaggerGenerator {
        let strip = self
            .strip_segments
            .unwrap_or_else(|| parent.path_prefix().len());
        let generator = SwaggerGenerator::new(self.title.as_str())
            .version(parent.nearest_version().unwrap_or(0).to_string())
            .schemes(self.schemes.iter().cloned())
            .base_path(parent.full_path())
            .content_types(self.content_types.iter().cloned())
            .strip_segments(strip);

        match self.host.as_deref().or_else(|| request.host()) {
            Some(host) => generator.host(host),
            None => generator,
        }
    }

    /// Builds the Swagger document of the parent container.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] with code 40442 when detached.
    pub fn document(&self, request: &dyn Request) -> ApiResult<SwaggerDocument> {
        let parent = self.parent().ok_or_else(detached)?;
        let document = self.generator(&parent, request).generate(parent.as_ref());
        debug!(
            title = %self.title,
            base_path = %document.base_path,
            paths = document.paths.len(),
            "swagger document generated"
        );
        Ok(document)
    }

    /// Reads a UI asset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] with code 40401 when the UI is
    /// disabled or the asset cannot be served.
    pub fn load_static(&self, file_name: &str) -> ApiResult<Bytes> {
        if !self.enable_ui {
            return Err(asset_not_found());
        }
        Ok(self.assets.load(file_name)?)
    }

    /// The UI page with its placeholder replaced. Rendered once.
    ///
    /// # Errors
    ///
    /// See [`load_static`](Self::load_static).
    pub fn ui_page(&self) -> ApiResult<String> {
        if let Some(page) = self.ui_cache.get() {
            return Ok(page.clone());
        }

        if !self.enable_ui {
            return Err(asset_not_found());
        }
        let page = self
            .assets
            .load_text(UI_PAGE)?
            .replace(PATH_PLACEHOLDER, &self.swagger_path().render());
        Ok(self.ui_cache.get_or_init(|| page).clone())
    }

    /// Response carrying a `.css` or `.js` UI asset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for any other extension and whenever
    /// [`load_static`](Self::load_static) fails.
    pub fn static_response(&self, file_name: &str) -> ApiResult<RawResponse> {
        let content_type = asset_content_type(file_name).ok_or_else(asset_not_found)?;
        let body = self.load_static(file_name)?;
        Ok(RawResponse::ok(body)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
            .with_header(CACHE_CONTROL, HeaderValue::from_static(STATIC_CACHE_CONTROL)))
    }
}

fn get_swagger() -> Operation {
    Operation::builder(
        Callback::new("get_swagger", |inv| {
            let document = owner(&inv)?.document(inv.request)?;
            Ok(Reply::Value(document.to_value()?))
        })
        .doc("Generate this document.")
        .response(ResponseEntry::new(200, "Swagger JSON of this API").without_schema()),
    )
    .build()
}

fn get_ui() -> Operation {
    Operation::builder(
        Callback::new("get_ui", |inv| {
            let page = owner(&inv)?.ui_page()?;
            Ok(Reply::Raw(
                RawResponse::ok(page).with_header(CONTENT_TYPE, HeaderValue::from_static("text/html")),
            ))
        })
        .doc("Load the Swagger UI interface")
        .produces("text/html")
        .response(ResponseEntry::new(200, "HTML content").without_schema()),
    )
    .path(UrlPath::literal("ui"))
    .build()
}

fn get_static() -> Operation {
    Operation::builder(
        Callback::new("get_static", |inv| {
            let file_name = inv
                .path_arg("file_name")
                .and_then(Value::as_str)
                .ok_or_else(asset_not_found)?;
            Ok(Reply::Raw(owner(&inv)?.static_response(file_name)?))
        })
        .doc("Get static content for UI.")
        .response(ResponseEntry::new(200, "HTML content").without_schema()),
    )
    .path(UrlPath::parse("ui/{file_name}"))
    .build()
}

impl Binding for SwaggerSpec {
    fn tags(&self) -> Vec<String> {
        vec![SWAGGER_TAG.to_string()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl OperationSource for SwaggerSpec {
    fn operation_paths<'a>(&'a self, prefix: Option<&UrlPath>) -> OperationPaths<'a> {
        let base = prefix.map_or_else(|| self.path_prefix.clone(), |p| p + &self.path_prefix);
        Box::new(
            self.operations
                .iter()
                .flat_map(move |op| Operation::operation_paths(&**op, Some(&base))),
        )
    }

    fn attach_to(&self, parent: &Weak<ApiContainer>) -> ApiResult<()> {
        self.parent.attach(parent, SWAGGER_TAG)
    }

    fn is_attached(&self) -> bool {
        self.parent.is_attached()
    }
}

impl fmt::Debug for SwaggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwaggerSpec")
            .field("title", &self.title)
            .field("enable_ui", &self.enable_ui)
            .field("host", &self.host)
            .field("assets", &self.assets.root())
            .field("operations", &self.operations.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SwaggerSpec`].
#[must_use]
#[derive(Debug)]
pub struct SwaggerSpecBuilder {
    title: String,
    enable_ui: bool,
    host: Option<String>,
    schemes: Vec<String>,
    content_types: Vec<String>,
    strip_segments: Option<usize>,
    assets: StaticAssets,
}

impl SwaggerSpecBuilder {
    /// Register the UI page and static asset operations.
    pub const fn enable_ui(mut self, enabled: bool) -> Self {
        self.enable_ui = enabled;
        self
    }

    /// Host to publish. The request host is used when unset.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Transfer protocols to publish.
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    /// Content types listed under `consumes` and `produces`.
    pub fn content_types<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_types = content_types.into_iter().map(Into::into).collect();
        self
    }

    /// Leading segments cut from every documented path.
    ///
    /// Defaults to the length of the parent container's own prefix.
    pub const fn strip_segments(mut self, count: usize) -> Self {
        self.strip_segments = Some(count);
        self
    }

    /// Directory holding `ui.html` and its assets.
    pub fn static_dir(self, root: impl Into<PathBuf>) -> Self {
        self.assets(StaticAssets::new(root))
    }

    /// Asset source for the UI.
    pub fn assets(mut self, assets: StaticAssets) -> Self {
        self.assets = assets;
        self
    }

    /// Builds the container and binds its operations to it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if binding fails.
    pub fn build(self) -> ApiResult<Arc<SwaggerSpec>> {
        let mut operations = vec![get_swagger()];
        if self.enable_ui {
            operations.push(get_ui());
            operations.push(get_static());
        }

        let spec = Arc::new(SwaggerSpec {
            title: self.title,
            enable_ui: self.enable_ui,
            host: self.host,
            schemes: self.schemes,
            content_types: self.content_types,
            strip_segments: self.strip_segments,
            assets: self.assets,
            path_prefix: UrlPath::literal(SWAGGER_TAG),
            operations: operations.into_iter().map(Arc::new).collect(),
            parent: ParentLink::new(),
            ui_cache: OnceLock::new(),
        });

        let owner: Arc<dyn Binding> = spec.clone();
        for operation in &spec.operations {
            operation.bind_to(&owner)?;
        }

        debug!(
            title = %spec.title,
            enable_ui = spec.enable_ui,
            operations = spec.operations.len(),
            "swagger container built"
        );
        Ok(spec)
    }
}
