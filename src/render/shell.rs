//! Single-page-app shell rendering.
//!
//! Emits a standalone HTML document that bootstraps a client-side app:
//! page metadata in the head, a mount point, and the initial state inlined
//! as JSON keyed by the request path. Clients that ask for
//! `application/json` get the bare payload instead.
//!
//! The document is assembled completely in memory, measured, and only then
//! stamped with headers; Content-Length is always the exact byte count.

use http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::core::context::RequestContext;
use crate::core::response::Response;
use crate::templates::html::escape;

/// Metadata describing one page of the site.
#[derive(Clone, Debug, Default)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
    /// Canonical social-preview image URL.
    pub image: String,
}

impl PageInfo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: String::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Full document title: page title, site tagline, site name, joined
    /// with " - " (empty segments skipped).
    pub fn document_title(&self, tagline: &str, site_name: &str) -> String {
        [self.title.as_str(), tagline, site_name]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

impl RequestContext {
    /// Render the SPA shell, or the bare JSON payload when the client's
    /// Accept header asks for `application/json`.
    pub fn render_shell(&self, status: StatusCode, page: &PageInfo, payload: &impl Serialize) -> Response {
        if self.request().accepts_json() {
            return self.json(status, payload);
        }

        let payload_json = match serde_json::to_string(payload) {
            Ok(json) => inline_safe(&json),
            Err(e) => {
                error!(
                    request_id = %self.request_id(),
                    "shell payload not serializable: {}", e
                );
                "null".to_string()
            }
        };

        let body = self.shell_document(page, &payload_json);

        Response::builder()
            .status(status)
            .html()
            .body(body)
            .measured()
    }

    /// Assemble the full shell document.
    fn shell_document(&self, page: &PageInfo, payload_json: &str) -> String {
        let site = &self.services().site;
        let assets = &site.asset_path;

        let title = escape(&page.document_title(&site.tagline, &site.name));
        let page_title = escape(&page.title);
        let description = escape(&page.description);
        let image = escape(&page.image);
        let full_url = escape(&self.full_url());
        let path = escape(self.request().path());
        let bundle = escape(&site.bundle_name);

        let mut doc = String::with_capacity(1024 + payload_json.len());
        doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        doc.push_str("<meta charset=\"utf-8\">\n");
        doc.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        doc.push_str(&format!("<title>{}</title>\n", title));
        doc.push_str(&format!("<link rel=\"icon\" href=\"{}/favicon.ico\">\n", assets));
        doc.push_str(&format!(
            "<link rel=\"manifest\" href=\"{}/manifest.json\">\n",
            assets
        ));
        doc.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}/css/{}.css\">\n",
            assets, bundle
        ));
        doc.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            description
        ));
        doc.push_str(&format!(
            "<meta property=\"og:title\" content=\"{}\">\n",
            page_title
        ));
        doc.push_str(&format!(
            "<meta property=\"og:description\" content=\"{}\">\n",
            description
        ));
        doc.push_str(&format!("<meta property=\"og:image\" content=\"{}\">\n", image));
        doc.push_str(&format!("<meta property=\"og:url\" content=\"{}\">\n", full_url));
        doc.push_str("<meta name=\"twitter:card\" content=\"summary_large_image\">\n");
        doc.push_str(&format!(
            "<meta name=\"twitter:title\" content=\"{}\">\n",
            page_title
        ));
        doc.push_str(&format!(
            "<meta name=\"twitter:description\" content=\"{}\">\n",
            description
        ));
        doc.push_str(&format!(
            "<meta name=\"twitter:image\" content=\"{}\">\n",
            image
        ));
        doc.push_str("</head>\n<body>\n<div id=\"app\"></div>\n");
        doc.push_str("<script>window.__BOOTSTRAP__ = window.__BOOTSTRAP__ || {};");
        doc.push_str(&format!(
            "window.__BOOTSTRAP__[\"{}\"] = {};</script>\n",
            path, payload_json
        ));
        doc.push_str(&format!(
            "<script src=\"{}/js/{}.js\"></script>\n",
            assets, bundle
        ));
        doc.push_str("</body>\n</html>\n");
        doc
    }
}

/// Make a JSON string safe for inlining in a `<script>` element.
///
/// Escaping `<` prevents a `</script>` sequence inside string values from
/// terminating the element early.
fn inline_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}
