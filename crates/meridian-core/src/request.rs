//! Request collaborator.
//!
//! Meridian does not parse HTTP itself. The transport hands operations an
//! implementation of [`Request`] that answers query lookups and turns the
//! request body into a resource instance.

use crate::error::ApiResult;
use crate::resource::Resource;

/// Tokens accepted as true by [`to_bool`], compared case-insensitively.
const TRUTHY: [&str; 6] = ["y", "yes", "t", "true", "1", "ok"];

/// Interprets a query string value as a boolean flag.
///
/// # Example
///
/// ```
/// use meridian_core::to_bool;
///
/// assert!(to_bool("TRUE"));
/// assert!(to_bool("yes"));
/// assert!(!to_bool("false"));
/// assert!(!to_bool("2"));
/// ```
#[must_use]
pub fn to_bool(value: &str) -> bool {
    let value = value.trim();
    TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(value))
}

/// The capabilities an operation needs from an incoming request.
pub trait Request: Send + Sync {
    /// Looks up a query parameter by name.
    fn query_param(&self, name: &str) -> Option<&str>;

    /// Looks up a query parameter, falling back to `default`.
    fn query_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.query_param(name).unwrap_or(default)
    }

    /// Decodes the request body as an instance of `resource`.
    fn deserialize(&self, resource: &dyn Resource) -> ApiResult<serde_json::Value>;

    /// Host the request was addressed to, if known.
    fn host(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bool_truthy() {
        for token in ["y", "Y", "yes", "t", "True", "1", "OK", " true "] {
            assert!(to_bool(token), "{token} should be truthy");
        }
    }

    #[test]
    fn test_to_bool_falsy() {
        for token in ["", "0", "no", "false", "maybe", "on"] {
            assert!(!to_bool(token), "{token} should be falsy");
        }
    }
}
