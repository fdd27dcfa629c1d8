//! URL path model.
//!
//! A [`UrlPath`] is an ordered list of [`PathNode`]s, each either a literal
//! segment or a typed parameter placeholder. Paths are immutable: every
//! combining operation returns a new path and leaves its operands alone.
//!
//! An absolute path starts with an empty literal segment, so `/api/v1`
//! is stored as `["", "api", "v1"]`.
//!
//! # Example
//!
//! ```
//! use meridian_core::{PathParam, UrlPath};
//!
//! let base = UrlPath::parse("/api/v1");
//! let item = UrlPath::literal("books") + PathParam::new("resource_id");
//!
//! assert_eq!((&base + &item).render(), "/api/v1/books/{resource_id}");
//! assert_eq!(base.render(), "/api/v1");
//! ```

use std::fmt;
use std::ops::Add;

use crate::doc::SchemaType;

/// A named, typed placeholder within a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathParam {
    /// Placeholder name, rendered as `{name}`.
    pub name: String,
    /// Primitive type of the value captured by the placeholder.
    pub param_type: SchemaType,
}

impl PathParam {
    /// Creates an integer placeholder, the usual type of resource identifiers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::typed(name, SchemaType::Integer)
    }

    /// Creates a placeholder with an explicit type.
    #[must_use]
    pub fn typed(name: impl Into<String>, param_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

/// A single node of a [`UrlPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathNode {
    /// Literal path segment.
    Literal(String),
    /// Typed parameter placeholder.
    Param(PathParam),
}

impl PathNode {
    fn render(&self) -> String {
        match self {
            Self::Literal(segment) => segment.clone(),
            Self::Param(param) => format!("{{{}}}", param.name),
        }
    }
}

/// An immutable, composable URL path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UrlPath {
    nodes: Vec<PathNode>,
}

impl UrlPath {
    /// Creates an empty path, the identity for concatenation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from nodes.
    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = PathNode>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Creates a path made of the given literal segments.
    #[must_use]
    pub fn from_literals<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_nodes(segments.into_iter().map(|s| PathNode::Literal(s.into())))
    }

    /// Creates a single-segment literal path.
    #[must_use]
    pub fn literal(segment: impl Into<String>) -> Self {
        Self::from_nodes([PathNode::Literal(segment.into())])
    }

    /// Parses a path string.
    ///
    /// Segments are split on `/`. `{name}` becomes a string placeholder and
    /// `{name:type}` a typed one (`int`, `integer`, `number`, `float`,
    /// `bool`, `boolean`, `str`, `string`). A leading `/` makes the path
    /// absolute.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::new();
        }
        if path == "/" {
            return Self::literal("");
        }

        let path = path.strip_suffix('/').unwrap_or(path);
        Self::from_nodes(path.split('/').map(parse_segment))
    }

    /// Returns the nodes of this path.
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Returns true if the path has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the path starts at the root.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        matches!(self.nodes.first(), Some(PathNode::Literal(s)) if s.is_empty())
    }

    /// Returns a new path that is `self` followed by `other`.
    #[must_use]
    pub fn concat(&self, other: &UrlPath) -> UrlPath {
        let mut nodes = Vec::with_capacity(self.nodes.len() + other.nodes.len());
        nodes.extend_from_slice(&self.nodes);
        nodes.extend_from_slice(&other.nodes);
        UrlPath { nodes }
    }

    /// Returns a new path without the first `count` nodes.
    #[must_use]
    pub fn skip(&self, count: usize) -> UrlPath {
        Self::from_nodes(self.nodes.iter().skip(count).cloned())
    }

    /// Returns the typed placeholders of this path, in order.
    pub fn parameters(&self) -> impl Iterator<Item = &PathParam> {
        self.nodes.iter().filter_map(|node| match node {
            PathNode::Param(param) => Some(param),
            PathNode::Literal(_) => None,
        })
    }

    /// Renders the canonical string form, placeholders as `{name}`.
    #[must_use]
    pub fn render(&self) -> String {
        if self.nodes.len() == 1 && self.is_absolute() {
            return "/".to_string();
        }
        self.nodes
            .iter()
            .map(PathNode::render)
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn parse_segment(segment: &str) -> PathNode {
    let Some(inner) = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
    else {
        return PathNode::Literal(segment.to_string());
    };

    let (name, param_type) = match inner.split_once(':') {
        Some((name, type_name)) => {
            let param_type = match type_name {
                "int" | "integer" => SchemaType::Integer,
                "number" | "float" => SchemaType::Number,
                "bool" | "boolean" => SchemaType::Boolean,
                _ => SchemaType::String,
            };
            (name, param_type)
        }
        None => (inner, SchemaType::String),
    };
    PathNode::Param(PathParam::typed(name, param_type))
}

impl fmt::Display for UrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for UrlPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<&UrlPath> for UrlPath {
    fn from(path: &UrlPath) -> Self {
        path.clone()
    }
}

impl From<PathNode> for UrlPath {
    fn from(node: PathNode) -> Self {
        Self { nodes: vec![node] }
    }
}

impl From<PathParam> for UrlPath {
    fn from(param: PathParam) -> Self {
        PathNode::Param(param).into()
    }
}

impl Add<&UrlPath> for &UrlPath {
    type Output = UrlPath;

    fn add(self, rhs: &UrlPath) -> UrlPath {
        self.concat(rhs)
    }
}

impl<T: Into<UrlPath>> Add<T> for UrlPath {
    type Output = UrlPath;

    fn add(self, rhs: T) -> UrlPath {
        self.concat(&rhs.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_absolute() {
        let path = UrlPath::parse("/api/v1");
        assert!(path.is_absolute());
        assert_eq!(path.len(), 3);
        assert_eq!(path.render(), "/api/v1");
    }

    #[test]
    fn test_parse_placeholders() {
        let path = UrlPath::parse("books/{resource_id:int}/pages/{page}");
        let params: Vec<_> = path.parameters().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "resource_id");
        assert_eq!(params[0].param_type, SchemaType::Integer);
        assert_eq!(params[1].param_type, SchemaType::String);
        assert_eq!(path.render(), "books/{resource_id}/pages/{page}");
    }

    #[test]
    fn test_root_renders_slash() {
        assert_eq!(UrlPath::parse("/").render(), "/");
        assert_eq!(UrlPath::new().render(), "");
    }

    #[test]
    fn test_concat_leaves_operands() {
        let a = UrlPath::parse("/api");
        let b = UrlPath::literal("books");
        let c = &a + &b;
        assert_eq!(c.render(), "/api/books");
        assert_eq!(a.render(), "/api");
        assert_eq!(b.render(), "books");
    }

    #[test]
    fn test_empty_is_identity() {
        let a = UrlPath::parse("/api/books");
        assert_eq!(&a + &UrlPath::new(), a);
        assert_eq!(&UrlPath::new() + &a, a);
    }

    #[test]
    fn test_skip() {
        let path = UrlPath::parse("/api/books/{id}");
        assert_eq!(path.skip(2).render(), "books/{id}");
        assert!(path.skip(10).is_empty());
    }

    fn arb_node() -> impl Strategy<Value = PathNode> {
        prop_oneof![
            "[a-z]{0,6}".prop_map(PathNode::Literal),
            "[a-z_]{1,6}".prop_map(|name| PathNode::Param(PathParam::new(name))),
        ]
    }

    fn arb_path() -> impl Strategy<Value = UrlPath> {
        prop::collection::vec(arb_node(), 0..5).prop_map(UrlPath::from_nodes)
    }

    proptest! {
        #[test]
        fn prop_concat_associative(a in arb_path(), b in arb_path(), c in arb_path()) {
            let left = &(&a + &b) + &c;
            let right = &a + &(&b + &c);
            prop_assert_eq!(left.render(), right.render());
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prop_concat_length(a in arb_path(), b in arb_path()) {
            prop_assert_eq!((&a + &b).len(), a.len() + b.len());
        }
    }
}
