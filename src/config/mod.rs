//! Configuration module.
//!
//! Centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use sitekit::config::Config;
//!
//! let config = Config::from_env();
//! println!("Site: {}", config.site.name);
//! ```

mod logging;
mod parse;
mod site;

pub use logging::LoggingConfig;
pub use site::SiteConfig;

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Site identity and asset conventions.
    pub site: SiteConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            site: SiteConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }
}
