//! Template engine seam.
//!
//! Template file loading and compilation live outside this crate. The
//! renderer only needs one operation: turn a named content template plus the
//! request's Bucket into a complete HTML string, optionally wrapped in a
//! master layout. The context assembles status, headers and Content-Length
//! itself, so the engine returns a string rather than writing to a sink.

use crate::core::context::Bucket;
use crate::core::error::Result;

use super::FuncRegistry;

/// Renders named templates against the request Bucket.
///
/// `funcs` is the helper registry built at startup; the engine invokes
/// helpers through it by name while expanding a template. `layout` is the
/// master layout to wrap the content template in; `None` renders the
/// content template bare.
pub trait TemplateEngine: Send + Sync {
    fn render(
        &self,
        template: &str,
        bucket: &Bucket,
        funcs: &FuncRegistry,
        layout: Option<&str>,
    ) -> Result<String>;
}
