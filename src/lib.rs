//! sitekit - per-request context and response rendering for server-side web apps.
//!
//! One [`RequestContext`](core::RequestContext) is created per inbound
//! request. Handlers accumulate values in its Bucket, then finish the
//! request with a single terminal render call: JSON, templated HTML, the
//! SPA shell, a file/byte passthrough, a redirect, or an error report.
//!
//! # Features
//!
//! - **Content negotiation**: debug dump flag, pjax partial navigation,
//!   alternate or absent master layouts, decided fresh per render call
//! - **SPA shell**: standalone HTML document with escaped page metadata and
//!   server-embedded bootstrap JSON, exact Content-Length
//! - **Error reporting**: friendly message + technical detail + call-site
//!   diagnostics, dispatched as text, JSON or templated HTML, never panics
//!   past the render boundary
//! - **Template helpers**: an immutable registry of pure helper functions
//!   (asset tags, navigation, date formatting) built once at startup
//! - **Structured logging**: JSON lines via tracing
//!
//! # Example
//!
//! ```rust,ignore
//! use sitekit::config::Config;
//! use sitekit::core::{RequestContext, Services};
//! use sitekit::render::Layout;
//!
//! let config = Config::from_env();
//! let services = Services::new(config.site, identity, cache, engine);
//!
//! // per request:
//! let mut ctx = RequestContext::new(request, services.clone())?;
//! ctx.add("Pets", &pets);
//! let response = ctx.html(http::StatusCode::OK, "pets", &Layout::Default);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod core;
pub mod logging;
pub mod render;
pub mod templates;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::{Bucket, Request, RequestContext, Response, Services};
pub use render::{ErrorMode, Layout, PageInfo};
