//! Values returned from operation callbacks.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

/// What a callback (and therefore a dispatch) produces.
///
/// No envelope is imposed by plain operations. Listing operations read
/// [`Reply::WithTotal`] as an `(items, total_count)` pair and wrap results
/// in a [`Listing`] unless the caller asked for a bare list.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to send back.
    Empty,
    /// A single value.
    Value(serde_json::Value),
    /// A collection together with the total number of matching items.
    WithTotal(serde_json::Value, u64),
    /// A paged listing envelope.
    Listing(Listing),
    /// A fully formed response that bypasses encoding.
    Raw(RawResponse),
}

impl Reply {
    /// Returns true for [`Reply::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<serde_json::Value> for Reply {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Paged listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Items of the current page.
    pub results: serde_json::Value,
    /// Limit applied to this page.
    pub limit: u64,
    /// Offset of the first item.
    pub offset: u64,
    /// Total number of items, when the callback knows it.
    pub total_count: Option<u64>,
}

/// A pre-built response: status, headers and raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Creates a `200 OK` response with the given body.
    #[must_use]
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Converts into an `http::Response` for the transport layer.
    #[must_use]
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_listing_serialization() {
        let listing = Listing {
            results: serde_json::json!([1, 2, 3]),
            limit: 2,
            offset: 0,
            total_count: Some(10),
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["results"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["total_count"], 10);
    }

    #[test]
    fn test_raw_into_http() {
        let raw = RawResponse::ok("<html/>")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        let response = raw.into_http();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(response.body().as_ref(), b"<html/>");
    }

    #[test]
    fn test_reply_from_value() {
        let reply: Reply = serde_json::json!({"id": 1}).into();
        assert!(matches!(reply, Reply::Value(_)));
        assert!(Reply::Empty.is_empty());
    }
}
