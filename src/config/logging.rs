//! Logging configuration.

use super::parse::{env_bool, env_or};

/// Logging configuration.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter, e.g. "info" or "sitekit=debug".
    pub level: String,
    /// Emit structured JSON lines instead of plain text.
    pub json: bool,
}

impl LoggingConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        Self {
            level: env_or("LOG_LEVEL", "info"),
            json: env_bool("LOG_JSON", true),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}
