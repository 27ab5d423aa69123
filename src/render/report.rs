//! Error reporting.
//!
//! Captures a user-safe friendly message plus the raw technical error text
//! and the call site of the failure, logs the lot, and terminates the
//! request on the negotiated channel (text, JSON or templated HTML).
//! Nothing escapes this boundary: logging and render failures are absorbed
//! so the response is always completed.

use std::fmt::Write as _;
use std::panic::Location;

use http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::core::context::RequestContext;
use crate::core::response::Response;

use super::negotiate::ERROR_TEMPLATE;

/// Placeholder line for a nil entry in the error list.
const NIL_ERROR: &str = "(nil error)";

/// Sentinel for diagnostics when no underlying errors were supplied.
const UNKNOWN: &str = "unknown";

/// Output channel for an error report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorMode {
    /// Plain-text body.
    Text,
    /// Structured JSON report.
    Json,
    /// Templated HTML error page.
    Html,
}

/// Source location of the failing call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl CallSite {
    /// Sentinel site used when no errors were supplied.
    pub fn unknown() -> Self {
        Self {
            function: UNKNOWN.to_string(),
            file: UNKNOWN.to_string(),
            line: 0,
        }
    }

    /// Capture the caller's file and line. The function name is not
    /// recoverable here; use [`call_site!`](crate::call_site) for it.
    #[track_caller]
    pub fn here() -> Self {
        let loc = Location::caller();
        Self {
            function: UNKNOWN.to_string(),
            file: loc.file().to_string(),
            line: loc.line(),
        }
    }

    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }
}

/// Capture the enclosing function name, source file and line as a
/// [`CallSite`].
#[macro_export]
macro_rules! call_site {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        $crate::render::report::CallSite::new(name, file!(), line!())
    }};
}

/// One formatted failure, constructed and discarded within a single call.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    #[serde(rename = "FriendlyError")]
    pub friendly: String,
    #[serde(rename = "NastyError")]
    pub nasty: String,
    #[serde(rename = "ErrorCode")]
    pub code: u16,
    #[serde(rename = "Function")]
    pub function: String,
    #[serde(rename = "File")]
    pub file: String,
    #[serde(rename = "Line")]
    pub line: u32,
}

impl ErrorReport {
    fn new(
        status: StatusCode,
        friendly: &str,
        errors: &[Option<&dyn std::error::Error>],
        site: CallSite,
    ) -> Self {
        let mut nasty = String::new();
        for (i, err) in errors.iter().enumerate() {
            if i > 0 {
                nasty.push('\n');
            }
            match err {
                Some(e) => {
                    let _ = write!(nasty, "{}", e);
                }
                None => nasty.push_str(NIL_ERROR),
            }
        }

        Self {
            friendly: friendly.to_string(),
            nasty,
            code: status.as_u16(),
            function: site.function,
            file: site.file,
            line: site.line,
        }
    }

    /// Human-readable form, used for both the log line and the text body.
    pub fn formatted(&self) -> String {
        let mut out = format!("ERROR {}: {}", self.code, self.friendly);
        if !self.nasty.is_empty() {
            out.push('\n');
            out.push_str(&self.nasty);
        }
        let _ = write!(out, "\nat {} ({}:{})", self.function, self.file, self.line);
        out
    }
}

impl RequestContext {
    /// Report a failure and terminate the request on `mode`'s channel.
    ///
    /// The caller's file and line are captured automatically; pass a
    /// [`call_site!`] via [`report_error_at`](Self::report_error_at) when
    /// the function name matters. Never fails.
    #[track_caller]
    pub fn report_error(
        &mut self,
        mode: ErrorMode,
        status: StatusCode,
        friendly: &str,
        errors: &[Option<&dyn std::error::Error>],
    ) -> Response {
        let site = if errors.is_empty() {
            CallSite::unknown()
        } else {
            CallSite::here()
        };
        self.report_error_at(site, mode, status, friendly, errors)
    }

    /// Report a failure with an explicitly captured call site.
    pub fn report_error_at(
        &mut self,
        site: CallSite,
        mode: ErrorMode,
        status: StatusCode,
        friendly: &str,
        errors: &[Option<&dyn std::error::Error>],
    ) -> Response {
        let site = if errors.is_empty() {
            CallSite::unknown()
        } else {
            site
        };
        let report = ErrorReport::new(status, friendly, errors, site);

        // Expected client validation noise is not worth a log line
        if status != StatusCode::BAD_REQUEST {
            error!(
                request_id = %self.request_id(),
                code = report.code,
                file = %report.file,
                line = report.line,
                function = %report.function,
                "{}: {}",
                report.friendly,
                report.nasty
            );
        }

        match mode {
            ErrorMode::Text => Response::builder()
                .status(status)
                .text()
                .body(report.formatted())
                .measured(),
            ErrorMode::Json => self.error_json(status, &report),
            ErrorMode::Html => self.error_html(status, &report),
        }
    }

    fn error_json(&self, status: StatusCode, report: &ErrorReport) -> Response {
        match serde_json::to_vec(report) {
            Ok(body) => Response::builder()
                .status(status)
                .json()
                .body(body)
                .measured(),
            Err(e) => {
                error!("error report not serializable: {}", e);
                Response::builder()
                    .status(status)
                    .text()
                    .body(report.formatted())
                    .measured()
            }
        }
    }

    fn error_html(&mut self, status: StatusCode, report: &ErrorReport) -> Response {
        self.add("FriendlyError", &report.friendly);
        self.add("NastyError", &report.nasty);
        self.add("ErrorCode", report.code);
        self.add("ErrorFunction", &report.function);
        self.add("ErrorFile", &report.file);
        self.add("ErrorLine", report.line);

        let engine = self.services().engine.clone();
        let funcs = self.services().funcs.clone();
        match engine.render(ERROR_TEMPLATE, self.bucket(), &funcs, None) {
            Ok(body) => Response::builder()
                .status(status)
                .html()
                .body(body)
                .measured(),
            Err(e) => {
                // Absorbed: the response must still terminate
                error!("error template failed: {}", e);
                Response::builder()
                    .status(status)
                    .text()
                    .body(report.formatted())
                    .measured()
            }
        }
    }
}
