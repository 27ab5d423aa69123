//! Core error types.

use std::fmt;

/// Errors for request parameter extraction, collaborator calls and rendering.
#[derive(Debug)]
pub enum Error {
    /// Malformed or missing URL parameter.
    Parameter {
        key: String,
        value: String,
        reason: String,
    },

    /// A cache/identity/store round trip failed.
    Upstream {
        collaborator: &'static str,
        message: String,
    },

    /// Template or encoding failure while producing a response.
    Render {
        template: String,
        message: String,
    },

    /// A redirect was requested with a non-redirect status code.
    InvalidRedirect {
        status: u16,
        location: String,
    },

    /// I/O error.
    Io(std::io::Error),

    /// Custom error with message.
    Custom(String),
}

impl Error {
    /// Build a parameter error for a key/value pair that failed to parse.
    pub fn parameter(key: &str, value: &str, reason: impl fmt::Display) -> Self {
        Error::Parameter {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build an upstream error for a named collaborator.
    pub fn upstream(collaborator: &'static str, message: impl fmt::Display) -> Self {
        Error::Upstream {
            collaborator,
            message: message.to_string(),
        }
    }

    /// Build a render error for a named template.
    pub fn render(template: &str, message: impl fmt::Display) -> Self {
        Error::Render {
            template: template.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parameter { key, value, reason } => {
                write!(f, "invalid parameter {}='{}': {}", key, value, reason)
            }
            Error::Upstream {
                collaborator,
                message,
            } => write!(f, "{} call failed: {}", collaborator, message),
            Error::Render { template, message } => {
                write!(f, "render failed for '{}': {}", template, message)
            }
            Error::InvalidRedirect { status, location } => {
                write!(f, "invalid redirect status {} for '{}'", status, location)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Render {
            template: "json".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Custom(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::parameter("id", "abc", "invalid digit");
        assert_eq!(err.to_string(), "invalid parameter id='abc': invalid digit");

        let err = Error::upstream("cache", "connection refused");
        assert_eq!(err.to_string(), "cache call failed: connection refused");

        let err = Error::render("home", "template not found");
        assert_eq!(
            err.to_string(),
            "render failed for 'home': template not found"
        );

        let err = Error::InvalidRedirect {
            status: 200,
            location: "/next".to_string(),
        };
        assert_eq!(err.to_string(), "invalid redirect status 200 for '/next'");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_string() {
        let err: Error = "custom error".into();
        assert!(matches!(err, Error::Custom(_)));
        assert_eq!(err.to_string(), "custom error");
    }
}
