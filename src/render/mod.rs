//! Terminal render calls.
//!
//! Every method here writes exactly one complete response: body assembled
//! first, Content-Length measured from the finished bytes, headers stamped
//! last. Render and encoding failures are absorbed at this layer (logged,
//! then surfaced as a plain-text fallback) because the request must always
//! terminate with a body.

pub mod negotiate;
pub mod report;
pub mod shell;

pub use negotiate::{negotiate, Layout, RenderPlan, DEFAULT_LAYOUT, PJAX_LAYOUT};
pub use report::{CallSite, ErrorMode, ErrorReport};
pub use shell::PageInfo;

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::core::context::RequestContext;
use crate::core::error::Error;
use crate::core::response::Response;

/// Redirect status codes this layer will emit.
const REDIRECT_CODES: &[u16] = &[301, 302, 303, 307, 308];

impl RequestContext {
    /// Write a JSON response.
    pub fn json(&self, status: StatusCode, payload: &impl Serialize) -> Response {
        match serde_json::to_vec(payload) {
            Ok(body) => Response::builder()
                .status(status)
                .json()
                .body(body)
                .measured(),
            Err(e) => {
                error!(request_id = %self.request_id(), "json encoding failed: {}", e);
                fallback_error("response encoding failed")
            }
        }
    }

    /// Render a named template and write it as HTML.
    ///
    /// The template/master-layout pair is negotiated fresh for this call
    /// (debug dump flag, pjax header, the caller's layout request).
    pub fn html(&self, status: StatusCode, template: &str, layout: &Layout) -> Response {
        let plan = negotiate(self.request(), template, layout);
        let services = self.services();

        match services
            .engine
            .render(plan.template, self.bucket(), &services.funcs, plan.layout)
        {
            Ok(body) => Response::builder()
                .status(status)
                .html()
                .body(body)
                .measured(),
            Err(e) => {
                error!(
                    request_id = %self.request_id(),
                    template = plan.template,
                    "template render failed: {}", e
                );
                fallback_error("the page could not be rendered")
            }
        }
    }

    /// Write a plain-text response.
    pub fn text(&self, status: StatusCode, body: impl Into<String>) -> Response {
        Response::builder()
            .status(status)
            .text()
            .body(body.into())
            .measured()
    }

    /// Write raw bytes with an explicit content type.
    pub fn send_bytes(
        &self,
        status: StatusCode,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Response {
        Response::builder()
            .status(status)
            .content_type(content_type)
            .body(body)
            .measured()
    }

    /// Write a file download; the content type is guessed from the name.
    pub fn send_file(&self, status: StatusCode, filename: &str, body: impl Into<Bytes>) -> Response {
        let mime = mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string();

        Response::builder()
            .status(status)
            .content_type(&mime)
            .attachment(filename)
            .body(body)
            .measured()
    }

    /// Write an inline PDF document.
    pub fn pdf(&self, filename: &str, body: impl Into<Bytes>) -> Response {
        Response::builder()
            .status(StatusCode::OK)
            .pdf()
            .inline_disposition(filename)
            .body(body)
            .measured()
    }

    /// Redirect to `location`.
    ///
    /// Only 301, 302, 303, 307 and 308 are accepted; any other status is a
    /// programming error and yields a 500 response instead of a redirect
    /// with a wrong code.
    pub fn redirect(&self, status: StatusCode, location: &str) -> Response {
        if !REDIRECT_CODES.contains(&status.as_u16()) {
            let err = Error::InvalidRedirect {
                status: status.as_u16(),
                location: location.to_string(),
            };
            error!(request_id = %self.request_id(), "{}", err);
            return fallback_error("invalid redirect");
        }

        Response::builder()
            .status(status)
            .location(location)
            .body(Bytes::new())
            .measured()
    }
}

/// Best-effort plain-text 500 used when a render path fails.
fn fallback_error(message: &str) -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .text()
        .body(message.to_string())
        .measured()
}
