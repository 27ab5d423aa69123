//! Content negotiation for HTML rendering.
//!
//! Decides, fresh on every call, which template and master layout a render
//! should use. Never cached: the debug flag and the pjax header vary
//! request-to-request even for the same handler.

use crate::core::request::Request;

/// Default master layout wrapping full page renders.
pub const DEFAULT_LAYOUT: &str = "application";

/// Partial master layout for pjax in-page navigation.
pub const PJAX_LAYOUT: &str = "pjax";

/// Diagnostic template selected by the `dump=1` debug flag.
pub const DUMP_TEMPLATE: &str = "dump";

/// Template rendered by the HTML error channel.
pub const ERROR_TEMPLATE: &str = "error";

/// Master layout requested by the handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Wrap in the default master layout.
    #[default]
    Default,
    /// Wrap in a named alternate master layout.
    Named(String),
    /// Render the content template bare.
    None,
}

impl Layout {
    /// Convenience constructor for a named layout.
    pub fn named(name: impl Into<String>) -> Self {
        Layout::Named(name.into())
    }
}

/// The negotiated template/layout pair handed to the engine.
#[derive(Debug, PartialEq, Eq)]
pub struct RenderPlan<'a> {
    pub template: &'a str,
    pub layout: Option<&'a str>,
}

/// Pick the template and master layout for one render call.
///
/// In order: the `dump=1` debug flag forces the diagnostic template
/// (rendered bare); a `X-PJAX: true` header swaps in the pjax master;
/// otherwise the handler's layout request stands, with the default master
/// filling the gap.
pub fn negotiate<'a>(request: &Request, template: &'a str, layout: &'a Layout) -> RenderPlan<'a> {
    if request.url_bool_param("dump") {
        return RenderPlan {
            template: DUMP_TEMPLATE,
            layout: None,
        };
    }

    if request.is_pjax() {
        return RenderPlan {
            template,
            layout: Some(PJAX_LAYOUT),
        };
    }

    let layout = match layout {
        Layout::None => None,
        Layout::Named(name) => Some(name.as_str()),
        Layout::Default => Some(DEFAULT_LAYOUT),
    };

    RenderPlan { template, layout }
}
