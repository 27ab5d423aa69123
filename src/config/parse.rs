//! Environment variable parsing utilities.

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse environment variable as boolean.
/// Treats "1", "true" (case-insensitive) as true.
pub fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a distinct variable name; the test harness runs tests
    // in one process.

    #[test]
    fn test_env_or() {
        std::env::remove_var("SITEKIT_T_ENV_OR");
        assert_eq!(env_or("SITEKIT_T_ENV_OR", "fallback"), "fallback");

        std::env::set_var("SITEKIT_T_ENV_OR", "set");
        assert_eq!(env_or("SITEKIT_T_ENV_OR", "fallback"), "set");
        std::env::remove_var("SITEKIT_T_ENV_OR");
    }

    #[test]
    fn test_env_bool() {
        std::env::remove_var("SITEKIT_T_ENV_BOOL");
        assert!(env_bool("SITEKIT_T_ENV_BOOL", true));
        assert!(!env_bool("SITEKIT_T_ENV_BOOL", false));

        std::env::set_var("SITEKIT_T_ENV_BOOL", "TRUE");
        assert!(env_bool("SITEKIT_T_ENV_BOOL", false));

        std::env::set_var("SITEKIT_T_ENV_BOOL", "0");
        assert!(!env_bool("SITEKIT_T_ENV_BOOL", true));
        std::env::remove_var("SITEKIT_T_ENV_BOOL");
    }
}
