//! Outbound response value.
//!
//! Terminal render calls assemble the complete body first, measure it, then
//! stamp headers. A `Response` is therefore always a finished artifact:
//! status, headers and the full body bytes.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};

/// Common header name constants for fast lookup.
mod header_names {
    use super::*;
    pub static CONTENT_TYPE: HeaderName = header::CONTENT_TYPE;
    pub static CONTENT_LENGTH: HeaderName = header::CONTENT_LENGTH;
    pub static CONTENT_DISPOSITION: HeaderName = header::CONTENT_DISPOSITION;
    pub static LOCATION: HeaderName = header::LOCATION;
}

/// Pre-allocated static header values for common content types.
mod content_types {
    use super::*;
    pub static TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain; charset=utf-8");
    pub static TEXT_HTML: HeaderValue = HeaderValue::from_static("text/html; charset=utf-8");
    pub static APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");
    pub static APPLICATION_PDF: HeaderValue = HeaderValue::from_static("application/pdf");
}

/// One complete HTTP response.
///
/// Note: Clone is intentionally not derived to prevent expensive copies,
/// and to keep the write-once-per-request property obvious at call sites.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create a new response builder.
    #[inline]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Get the status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the response body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get body length.
    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get Content-Type header.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(&header_names::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Length header as parsed bytes.
    #[inline]
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(&header_names::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

impl From<Response> for http::Response<Bytes> {
    fn from(res: Response) -> Self {
        let mut builder = http::Response::builder().status(res.status);

        if let Some(headers) = builder.headers_mut() {
            *headers = res.headers;
        }

        builder.body(res.body).unwrap()
    }
}

/// Builder for assembling responses.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Option<HeaderMap>, // Lazy allocation
    body: Bytes,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    /// Create a new response builder.
    #[inline]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: None,
            body: Bytes::new(),
        }
    }

    /// Set the status code.
    #[inline]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add header with typed HeaderName and HeaderValue (zero-alloc for static values).
    #[inline]
    pub fn header_value(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .insert(name, value);
        self
    }

    /// Add header by strings.
    #[inline]
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers
                .get_or_insert_with(HeaderMap::new)
                .insert(name, value);
        }
        self
    }

    /// Set the body.
    #[inline]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set Content-Type header (generic).
    #[inline]
    pub fn content_type(self, content_type: &str) -> Self {
        self.header("content-type", content_type)
    }

    /// Set Content-Type to text/html.
    #[inline]
    pub fn html(self) -> Self {
        self.header_value(
            header_names::CONTENT_TYPE.clone(),
            content_types::TEXT_HTML.clone(),
        )
    }

    /// Set Content-Type to application/json.
    #[inline]
    pub fn json(self) -> Self {
        self.header_value(
            header_names::CONTENT_TYPE.clone(),
            content_types::APPLICATION_JSON.clone(),
        )
    }

    /// Set Content-Type to text/plain.
    #[inline]
    pub fn text(self) -> Self {
        self.header_value(
            header_names::CONTENT_TYPE.clone(),
            content_types::TEXT_PLAIN.clone(),
        )
    }

    /// Set Content-Type to application/pdf.
    #[inline]
    pub fn pdf(self) -> Self {
        self.header_value(
            header_names::CONTENT_TYPE.clone(),
            content_types::APPLICATION_PDF.clone(),
        )
    }

    /// Set a Content-Disposition header for a named download.
    pub fn attachment(self, filename: &str) -> Self {
        let value = format!("attachment; filename=\"{}\"", filename.replace('"', ""));
        match HeaderValue::try_from(value) {
            Ok(v) => self.header_value(header_names::CONTENT_DISPOSITION.clone(), v),
            Err(_) => self,
        }
    }

    /// Set an inline Content-Disposition header with a filename hint.
    pub fn inline_disposition(self, filename: &str) -> Self {
        let value = format!("inline; filename=\"{}\"", filename.replace('"', ""));
        match HeaderValue::try_from(value) {
            Ok(v) => self.header_value(header_names::CONTENT_DISPOSITION.clone(), v),
            Err(_) => self,
        }
    }

    /// Set a Location header for redirects.
    pub fn location(self, location: &str) -> Self {
        match HeaderValue::try_from(location) {
            Ok(v) => self.header_value(header_names::LOCATION.clone(), v),
            Err(_) => self,
        }
    }

    /// Build the response, stamping Content-Length from the assembled body.
    ///
    /// Call after `body()`; the length is measured at this point.
    pub fn measured(self) -> Response {
        let len = self.body.len();
        self.header_value(
            header_names::CONTENT_LENGTH.clone(),
            HeaderValue::from(len),
        )
        .build()
    }

    /// Build the response without touching Content-Length.
    #[inline]
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers.unwrap_or_default(),
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_builder() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header("x-custom", "value")
            .body("Hello")
            .build();

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.header("x-custom"), Some("value"));
        assert_eq!(res.body().as_ref(), b"Hello");
    }

    #[test]
    fn test_measured_stamps_exact_length() {
        let res = Response::builder()
            .html()
            .body("<html>héllo</html>")
            .measured();

        // Byte length, not char count
        assert_eq!(res.content_length(), Some("<html>héllo</html>".len() as u64));
        assert_eq!(res.content_length(), Some(res.body_len() as u64));
    }

    #[test]
    fn test_content_types() {
        let html = Response::builder().html().body("<h1>Hi</h1>").build();
        assert_eq!(html.content_type(), Some("text/html; charset=utf-8"));

        let json = Response::builder().json().body("{}").build();
        assert_eq!(json.content_type(), Some("application/json"));

        let text = Response::builder().text().body("Hello").build();
        assert_eq!(text.content_type(), Some("text/plain; charset=utf-8"));

        let pdf = Response::builder().pdf().body("%PDF").build();
        assert_eq!(pdf.content_type(), Some("application/pdf"));
    }

    #[test]
    fn test_disposition_headers() {
        let res = Response::builder().attachment("report.csv").build();
        assert_eq!(
            res.header("content-disposition"),
            Some("attachment; filename=\"report.csv\"")
        );

        let res = Response::builder().inline_disposition("doc.pdf").build();
        assert_eq!(
            res.header("content-disposition"),
            Some("inline; filename=\"doc.pdf\"")
        );
    }

    #[test]
    fn test_location_header() {
        let res = Response::builder()
            .status(StatusCode::FOUND)
            .location("/next")
            .build();
        assert_eq!(res.header("location"), Some("/next"));
    }

    #[test]
    fn test_empty_builder_no_headers() {
        // Builder should not allocate HeaderMap if no headers added
        let res = Response::builder().status(StatusCode::NO_CONTENT).build();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert!(res.headers().is_empty());
    }

    #[test]
    fn test_response_to_http() {
        let res = Response::builder()
            .status(StatusCode::OK)
            .header("x-test", "value")
            .body("Hello")
            .build();

        let http_res: http::Response<Bytes> = res.into();
        assert_eq!(http_res.status(), StatusCode::OK);
        assert_eq!(http_res.headers().get("x-test").unwrap(), "value");
        assert_eq!(http_res.body().as_ref(), b"Hello");
    }
}
