//! Swagger 2.0 document types.
//!
//! The document is built from [`IndexMap`]s throughout so that two runs over
//! an unchanged registration serialize byte-for-byte identically.
//!
//! Reference: <https://swagger.io/specification/v2/>

use indexmap::IndexMap;
use meridian_core::doc::{OperationDoc, ParameterDoc, Schema};
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, DocsResult};

/// Swagger version emitted in every document.
pub const SWAGGER_VERSION: &str = "2.0";

/// Swagger document root object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Swagger version (always "2.0").
    pub swagger: String,
    /// API metadata.
    pub info: Info,
    /// Host serving the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Transfer protocols.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    /// Path all operation paths are relative to.
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Content types the API accepts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    /// Content types the API emits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Operations keyed by path, in first-registration order.
    pub paths: IndexMap<String, PathItem>,
    /// Schemas keyed by resource name.
    pub definitions: IndexMap<String, Schema>,
}

impl SwaggerDocument {
    /// Serializes the document as compact JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        serde_json::to_string(self).map_err(DocsError::from)
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DocsResult<String> {
        serde_json::to_string_pretty(self).map_err(DocsError::from)
    }

    /// Serializes the document into a JSON value.
    pub fn to_value(&self) -> DocsResult<serde_json::Value> {
        serde_json::to_value(self).map_err(DocsError::from)
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
}

/// Operations available on a single path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// Path placeholders, shared by every operation on the path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDoc>,
    /// Operations keyed by lower-cased HTTP method.
    #[serde(flatten)]
    pub operations: IndexMap<String, OperationDoc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::doc::SchemaType;

    fn empty_document() -> SwaggerDocument {
        SwaggerDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: Info {
                title: "Library".to_string(),
                version: "1".to_string(),
            },
            host: None,
            schemes: vec![],
            base_path: "/api/v1".to_string(),
            consumes: vec![],
            produces: vec![],
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
        }
    }

    #[test]
    fn test_optional_fields_skipped() {
        let value = empty_document().to_value().unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["swagger", "info", "basePath", "paths", "definitions"]);
    }

    #[test]
    fn test_path_item_flattens_methods() {
        let mut item = PathItem {
            parameters: vec![ParameterDoc {
                name: "resource_id".to_string(),
                location: "path".to_string(),
                description: None,
                required: true,
                param_type: Some(SchemaType::Integer),
                default: None,
                maximum: None,
                minimum: None,
                schema: None,
            }],
            operations: IndexMap::new(),
        };
        item.operations.insert(
            "get".to_string(),
            OperationDoc {
                operation_id: "get_book".to_string(),
                description: String::new(),
                summary: None,
                tags: vec![],
                deprecated: false,
                consumes: vec![],
                parameters: vec![],
                produces: vec![],
                responses: IndexMap::new(),
            },
        );

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["get"]["operationId"], "get_book");
        assert_eq!(value["parameters"][0]["in"], "path");
        assert_eq!(value["parameters"][0]["required"], true);
    }

    #[test]
    fn test_pretty_json() {
        let json = empty_document().to_json_pretty().unwrap();
        assert!(json.contains("\"swagger\": \"2.0\""));
        assert!(json.contains("\"basePath\": \"/api/v1\""));
    }
}
