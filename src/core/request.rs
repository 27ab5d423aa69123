//! Inbound request abstraction.
//!
//! Wraps the `http` request parts with the extras this crate needs: the
//! route-bound path variables handed over by the routing layer, a parsed
//! query string, and the header accessors the negotiation pipeline reads.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;

/// Header name constants for fast lookup.
mod header_names {
    use super::*;

    pub static ACCEPT: HeaderName = header::ACCEPT;
    pub static HOST: HeaderName = header::HOST;
}

/// Lazily initialized custom header names.
static X_PJAX: std::sync::LazyLock<HeaderName> =
    std::sync::LazyLock::new(|| HeaderName::from_static("x-pjax"));
static X_FORWARDED_PROTO: std::sync::LazyLock<HeaderName> =
    std::sync::LazyLock::new(|| HeaderName::from_static("x-forwarded-proto"));

/// Inbound HTTP request plus routing metadata.
///
/// Note: Clone is intentionally not derived to prevent expensive copies.
/// One `Request` belongs to exactly one in-flight request.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    /// Path variables bound by the routing layer (raw, still encoded).
    route_params: HashMap<String, String>,
    /// Whether the connection itself is TLS.
    tls: bool,
}

impl Request {
    /// Create a new request.
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            route_params: HashMap::new(),
            tls: false,
        }
    }

    /// Attach route-bound path variables from the routing layer.
    pub fn with_route_params(mut self, params: HashMap<String, String>) -> Self {
        self.route_params = params;
        self
    }

    /// Mark the underlying connection as TLS.
    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request path.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get the raw query string.
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Get the path plus query string, as the client sent it.
    pub fn path_and_query(&self) -> String {
        match self.uri.path_and_query() {
            Some(pq) => pq.as_str().to_string(),
            None => self.uri.path().to_string(),
        }
    }

    /// Get the full URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the request body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Whether the connection is TLS.
    #[inline]
    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// Get a header value by HeaderName (fast path).
    #[inline]
    fn header_by_name(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get a header value by string name (slower, case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get Accept header value.
    #[inline]
    pub fn accept(&self) -> Option<&str> {
        self.header_by_name(&header_names::ACCEPT)
    }

    /// Check if the client asked for JSON (case-insensitive Accept match).
    pub fn accepts_json(&self) -> bool {
        self.accept()
            .map(|v| v.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }

    /// Get the Host header, falling back to the URI authority.
    pub fn host(&self) -> &str {
        self.header_by_name(&header_names::HOST)
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
            .unwrap_or("")
    }

    /// Check if this is a pjax partial-navigation request.
    #[inline]
    pub fn is_pjax(&self) -> bool {
        self.header_by_name(&X_PJAX) == Some("true")
    }

    /// Get the X-Forwarded-Proto header as set by a reverse proxy.
    #[inline]
    pub fn forwarded_proto(&self) -> Option<&str> {
        self.header_by_name(&X_FORWARDED_PROTO)
    }

    /// Get a route-bound path variable (empty if unmatched).
    pub fn route_param(&self, key: &str) -> &str {
        self.route_params.get(key).map(String::as_str).unwrap_or("")
    }

    /// Get the first query-string value for `key` (raw, still encoded).
    ///
    /// Keys are matched exactly; a bare `?flag` yields an empty value.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        let query = self.query()?;
        for pair in query.split('&') {
            let mut parts = pair.splitn(2, '=');
            let k = parts.next().unwrap_or("");
            if decoded_eq(k, key) {
                return Some(parts.next().unwrap_or(""));
            }
        }
        None
    }
}

/// Compare a possibly percent-encoded query key against a plain key.
fn decoded_eq(encoded: &str, plain: &str) -> bool {
    if encoded == plain {
        return true;
    }
    percent_decode_str(encoded).decode_utf8_lossy() == plain
}

impl<B> From<http::Request<B>> for Request
where
    B: Into<Bytes>,
{
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: body.into(),
            route_params: HashMap::new(),
            tls: false,
        }
    }
}
