//! Site identity and asset configuration.
//!
//! Process-wide, read-only for the duration of a request. One instance is
//! built at startup and shared behind an `Arc`.

use super::parse::{env_bool, env_or};

/// Site identity, scheme policy and static asset conventions.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Site name, the last segment of every document title.
    pub name: String,
    /// Tagline, the middle segment of every document title.
    pub tagline: String,
    /// Canonical base URL, e.g. `https://example.com`.
    pub base_url: String,
    /// Force the `https` scheme regardless of connection state.
    /// Set in production behind a TLS-terminating proxy.
    pub force_https: bool,
    /// Base path for static assets, no trailing slash.
    pub asset_path: String,
    /// Name of the stylesheet/script bundle referenced by the SPA shell.
    pub bundle_name: String,
}

impl SiteConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        Self {
            name: env_or("SITE_NAME", "Site"),
            tagline: env_or("SITE_TAGLINE", ""),
            base_url: env_or("SITE_URL", "http://localhost:8080"),
            force_https: env_bool("FORCE_HTTPS", false),
            asset_path: env_or("ASSET_PATH", "/assets").trim_end_matches('/').to_string(),
            bundle_name: env_or("BUNDLE_NAME", "app"),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Site".to_string(),
            tagline: String::new(),
            base_url: "http://localhost:8080".to_string(),
            force_https: false,
            asset_path: "/assets".to_string(),
            bundle_name: "app".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let site = SiteConfig::default();
        assert_eq!(site.name, "Site");
        assert_eq!(site.asset_path, "/assets");
        assert!(!site.force_https);
    }

    #[test]
    fn test_asset_path_trailing_slash_trimmed() {
        std::env::set_var("ASSET_PATH", "/static/");
        let site = SiteConfig::from_env();
        assert_eq!(site.asset_path, "/static");
        std::env::remove_var("ASSET_PATH");
    }
}
