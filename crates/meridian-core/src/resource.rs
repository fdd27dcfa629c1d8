//! Resource introspection.
//!
//! Operations reference resource types to document request bodies and
//! responses. A [`Resource`] only has to describe itself: a unique name and a
//! list of [`Field`]s. [`ResourceDef`] is a ready-made builder implementation.

use std::fmt;
use std::sync::Arc;

use crate::doc::SchemaType;

/// Shared handle to a resource type.
pub type ResourceRef = Arc<dyn Resource>;

/// Declared type of a resource field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Text.
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Number,
    /// Boolean flag.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Time of day.
    Time,
    /// List of values.
    List,
    /// Nested mapping.
    Dict,
}

impl FieldType {
    /// Returns the primitive schema type used to document this field.
    #[must_use]
    pub const fn schema_type(self) -> SchemaType {
        match self {
            Self::Integer => SchemaType::Integer,
            Self::Number => SchemaType::Number,
            Self::Boolean => SchemaType::Boolean,
            Self::List => SchemaType::Array,
            Self::Dict => SchemaType::Object,
            Self::String | Self::Date | Self::DateTime | Self::Time => SchemaType::String,
        }
    }

    /// Returns the schema format for this field, if it has one.
    #[must_use]
    pub const fn format(self) -> Option<&'static str> {
        match self {
            Self::Integer => Some("int64"),
            Self::Number => Some("float"),
            Self::Date => Some("date"),
            Self::DateTime | Self::Time => Some("date-time"),
            Self::String | Self::Boolean | Self::List | Self::Dict => None,
        }
    }
}

/// A single field of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Optional doc text.
    pub description: Option<String>,
    /// Allowed values, empty when unrestricted.
    pub choices: Vec<serde_json::Value>,
}

impl Field {
    /// Creates a field without description or choices.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
            choices: Vec::new(),
        }
    }

    /// Sets the doc text.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restricts the field to the given values.
    #[must_use]
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }
}

/// A resource type that can be documented.
pub trait Resource: Send + Sync + 'static {
    /// Fully qualified name, used as the key in `definitions`.
    fn resource_name(&self) -> &str;

    /// Short display name, substituted for `{name}` in response descriptions.
    fn name(&self) -> &str {
        let full = self.resource_name();
        full.rsplit('.').next().unwrap_or(full)
    }

    /// Fields of the resource, in declaration order.
    fn fields(&self) -> Vec<Field>;
}

impl fmt::Debug for dyn Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("resource_name", &self.resource_name())
            .finish_non_exhaustive()
    }
}

/// A resource described by a name and a field list.
///
/// # Example
///
/// ```
/// use meridian_core::{Field, FieldType, Resource, ResourceDef};
///
/// let book = ResourceDef::new("library.Book")
///     .field("title", FieldType::String)
///     .with_field(Field::new("format", FieldType::String).choices(["paper", "ebook"]));
///
/// assert_eq!(book.name(), "Book");
/// assert_eq!(book.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDef {
    resource_name: String,
    fields: Vec<Field>,
}

impl ResourceDef {
    /// Creates a resource with no fields.
    #[must_use]
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a plain field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.with_field(Field::new(name, field_type))
    }

    /// Adds a fully specified field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

impl Resource for ResourceDef {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn fields(&self) -> Vec<Field> {
        self.fields.clone()
    }
}

/// The standard error shape, see [`ErrorBody`](crate::ErrorBody).
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorResource;

impl ErrorResource {
    /// Returns a shared handle.
    #[must_use]
    pub fn shared() -> ResourceRef {
        Arc::new(Self)
    }
}

impl Resource for ErrorResource {
    fn resource_name(&self) -> &str {
        "Error"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("status", FieldType::Integer).describe("HTTP status code of the response."),
            Field::new("code", FieldType::Integer).describe("Custom application specific error code."),
            Field::new("message", FieldType::String).describe("A message that can be displayed to an end user."),
            Field::new("developer_message", FieldType::String)
                .describe("An error message suitable for the application developer."),
            Field::new("meta", FieldType::Dict).describe("Additional meta information."),
        ]
    }
}

/// The paged-listing envelope, see [`Listing`](crate::Listing).
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingResource;

impl ListingResource {
    /// Returns a shared handle.
    #[must_use]
    pub fn shared() -> ResourceRef {
        Arc::new(Self)
    }
}

impl Resource for ListingResource {
    fn resource_name(&self) -> &str {
        "Listing"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("results", FieldType::List).describe("List of resources."),
            Field::new("limit", FieldType::Integer).describe("Resource limit."),
            Field::new("offset", FieldType::Integer).describe("Offset within resource."),
            Field::new("total_count", FieldType::Integer).describe("Total number of resources."),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(ResourceDef::new("library.Book").name(), "Book");
        assert_eq!(ResourceDef::new("Author").name(), "Author");
    }

    #[test]
    fn test_field_types() {
        assert_eq!(FieldType::Date.schema_type(), SchemaType::String);
        assert_eq!(FieldType::Date.format(), Some("date"));
        assert_eq!(FieldType::Boolean.format(), None);
        assert_eq!(FieldType::Integer.schema_type(), SchemaType::Integer);
    }

    #[test]
    fn test_builtin_resources() {
        assert_eq!(ErrorResource.resource_name(), "Error");
        assert_eq!(ListingResource.fields().len(), 4);
        let names: Vec<String> = ErrorResource.fields().into_iter().map(|f| f.name).collect();
        assert!(names.contains(&"developer_message".to_string()));
    }

    #[test]
    fn test_choices() {
        let field = Field::new("format", FieldType::String).choices(["paper", "ebook"]);
        assert_eq!(field.choices, vec![serde_json::json!("paper"), serde_json::json!("ebook")]);
    }
}
