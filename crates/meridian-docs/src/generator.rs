//! Specification synthesis.
//!
//! [`SwaggerGenerator`] walks an [`OperationSource`] exactly once and
//! flattens it into a path, method, operation table plus a de-duplicated map
//! of resource schemas.
//!
//! Resource schemas are keyed by resource name. When two distinct resource
//! types share a name, the last one encountered wins; its entry keeps the
//! position of the first.

use indexmap::IndexMap;
use meridian_core::doc::{ParameterDoc, Schema};
use meridian_core::{ErrorResource, ListingResource, OperationSource, Resource, UrlPath};
use tracing::debug;

use crate::document::{Info, PathItem, SwaggerDocument, SWAGGER_VERSION};
use crate::error::DocsResult;

/// Builds the schema definition of a resource.
///
/// # Example
///
/// ```
/// use meridian_core::{FieldType, ResourceDef};
/// use meridian_docs::resource_definition;
///
/// let book = ResourceDef::new("library.Book").field("pages", FieldType::Integer);
/// let schema = resource_definition(&book);
///
/// assert_eq!(schema.properties["pages"].format.as_deref(), Some("int64"));
/// ```
#[must_use]
pub fn resource_definition(resource: &dyn Resource) -> Schema {
    resource
        .fields()
        .into_iter()
        .fold(Schema::object(), |schema, field| {
            let mut property = Schema::of(field.field_type.schema_type());
            property.format = field.field_type.format().map(str::to_string);
            property.description = field.description;
            property.enum_values = field.choices;
            schema.property(field.name, property)
        })
}

/// Path-level parameters for the placeholders of `path`.
#[must_use]
pub fn path_parameters(path: &UrlPath) -> Vec<ParameterDoc> {
    path.parameters()
        .map(|param| ParameterDoc {
            name: param.name.clone(),
            location: "path".to_string(),
            description: None,
            required: true,
            param_type: Some(param.param_type),
            default: None,
            maximum: None,
            minimum: None,
            schema: None,
        })
        .collect()
}

fn path_key(path: &UrlPath) -> String {
    let rendered = path.render();
    if rendered.starts_with('/') {
        rendered
    } else {
        format!("/{rendered}")
    }
}

/// Flattened operations and schema definitions.
pub type ParsedOperations = (IndexMap<String, PathItem>, IndexMap<String, Schema>);

/// Generator for Swagger 2.0 documents.
///
/// # Example
///
/// ```
/// use meridian_core::{fixtures, ApiContainer};
/// use meridian_docs::SwaggerGenerator;
///
/// let v1 = ApiContainer::version(1)
///     .add(fixtures::library_api().unwrap())
///     .build()
///     .unwrap();
///
/// let document = SwaggerGenerator::new("Library")
///     .version("1")
///     .base_path("/api/v1")
///     .generate(v1.as_ref());
///
/// assert!(document.paths.contains_key("/book/{resource_id}"));
/// assert!(document.definitions.contains_key("library.Book"));
/// ```
#[derive(Debug, Clone)]
pub struct SwaggerGenerator {
    title: String,
    version: String,
    host: Option<String>,
    schemes: Vec<String>,
    base_path: UrlPath,
    content_types: Vec<String>,
    strip_segments: usize,
}

impl SwaggerGenerator {
    /// Create a new generator.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: "0".to_string(),
            host: None,
            schemes: Vec::new(),
            base_path: UrlPath::new(),
            content_types: vec!["application/json".to_string()],
            strip_segments: 1,
        }
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the transfer protocols.
    #[must_use]
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the base path.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<UrlPath>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the content types listed under `consumes` and `produces`.
    #[must_use]
    pub fn content_types<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_types = content_types.into_iter().map(Into::into).collect();
        self
    }

    /// Set how many leading path segments belong to the walked container.
    #[must_use]
    pub fn strip_segments(mut self, count: usize) -> Self {
        self.strip_segments = count;
        self
    }

    /// Get the configured host.
    #[must_use]
    pub fn configured_host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Flatten `source` into paths and resource definitions.
    #[must_use]
    pub fn parse_operations(&self, source: &dyn OperationSource) -> ParsedOperations {
        let mut definitions: IndexMap<String, Schema> = IndexMap::new();
        for builtin in [ErrorResource::shared(), ListingResource::shared()] {
            definitions.insert(builtin.resource_name().to_string(), resource_definition(builtin.as_ref()));
        }

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        for (path, operation) in source.operation_paths(None) {
            let path = path.skip(self.strip_segments);

            for resource in operation.referenced_resources() {
                definitions.insert(resource.resource_name().to_string(), resource_definition(resource.as_ref()));
            }

            let item = paths.entry(path_key(&path)).or_default();
            let parameters = path_parameters(&path);
            if !parameters.is_empty() {
                item.parameters = parameters;
            }

            let doc = operation.to_documentation();
            for method in operation.methods() {
                item.operations.insert(method.as_str().to_lowercase(), doc.clone());
            }
        }

        debug!(
            paths = paths.len(),
            definitions = definitions.len(),
            "operations parsed"
        );
        (paths, definitions)
    }

    /// Generate a Swagger document for `source`.
    #[must_use]
    pub fn generate(&self, source: &dyn OperationSource) -> SwaggerDocument {
        let (paths, definitions) = self.parse_operations(source);
        SwaggerDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                version: self.version.clone(),
            },
            host: self.host.clone(),
            schemes: self.schemes.clone(),
            base_path: self.base_path.render(),
            consumes: self.content_types.clone(),
            produces: self.content_types.clone(),
            paths,
            definitions,
        }
    }

    /// Generate the Swagger document as pretty-printed JSON.
    pub fn generate_json(&self, source: &dyn OperationSource) -> DocsResult<String> {
        self.generate(source).to_json_pretty()
    }
}
