//! URL parameter extraction.
//!
//! Resolution order for every accessor: route-bound path variable first,
//! query string second. Values are percent-decoded; a decode failure is
//! swallowed and the raw encoded value is returned instead of failing the
//! request.

use chrono::{DateTime, FixedOffset, NaiveDate};
use percent_encoding::percent_decode_str;

use super::error::{Error, Result};
use super::request::Request;

/// Strings the boolean accessor treats as true (case-sensitive).
const TRUTHY: &[&str] = &["true", "yes", "1", "y", "✓"];

/// Date layout accepted by `url_short_date_param`.
const SHORT_DATE_FORMAT: &str = "%Y-%m-%d";

impl Request {
    /// Get a named parameter from the route bindings or the query string.
    ///
    /// Returns an empty string when the key is absent from both. Literal
    /// `%20` sequences remaining after decoding are normalized to a space.
    pub fn url_param(&self, key: &str) -> String {
        let raw = {
            let bound = self.route_param(key);
            if !bound.is_empty() {
                bound
            } else {
                self.query_param(key).unwrap_or("")
            }
        };

        let decoded = match percent_decode_str(raw).decode_utf8() {
            Ok(s) => s.into_owned(),
            Err(_) => raw.to_string(),
        };

        if decoded.contains("%20") {
            decoded.replace("%20", " ")
        } else {
            decoded
        }
    }

    /// Get a parameter parsed as an integer.
    pub fn url_int_param(&self, key: &str) -> Result<i64> {
        let value = self.url_param(key);
        value
            .parse()
            .map_err(|e| Error::parameter(key, &value, e))
    }

    /// Get a parameter parsed as an integer, with a default for empty or
    /// unparseable input.
    pub fn url_int_param_with_default(&self, key: &str, default: i64) -> i64 {
        let value = self.url_param(key);
        if value.is_empty() {
            return default;
        }
        value.parse().unwrap_or(default)
    }

    /// Get a parameter interpreted as a boolean. Total: never errors.
    ///
    /// Exactly `true`, `yes`, `1`, `y` and `✓` are true (case-sensitive);
    /// everything else, including unparseable input, is false.
    pub fn url_bool_param(&self, key: &str) -> bool {
        let value = self.url_param(key);
        TRUTHY.contains(&value.as_str())
    }

    /// Get a parameter parsed as an RFC 3339 date-time.
    pub fn url_date_param(&self, key: &str) -> Result<DateTime<FixedOffset>> {
        let value = self.url_param(key);
        DateTime::parse_from_rfc3339(&value).map_err(|e| Error::parameter(key, &value, e))
    }

    /// Get a parameter parsed as a `YYYY-MM-DD` date.
    pub fn url_short_date_param(&self, key: &str) -> Result<NaiveDate> {
        let value = self.url_param(key);
        NaiveDate::parse_from_str(&value, SHORT_DATE_FORMAT)
            .map_err(|e| Error::parameter(key, &value, e))
    }

    /// Get the unique record identifier for content-addressed lookups.
    ///
    /// Checks `uniqueid` first, falling back to `ulid`; the result is
    /// upper-cased.
    pub fn url_unique(&self) -> String {
        let value = self.url_param("uniqueid");
        if !value.is_empty() {
            return value.to_uppercase();
        }
        self.url_param("ulid").to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::HashMap;

    fn request(uri: &str) -> Request {
        let http_req = http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(Bytes::new())
            .unwrap();
        Request::from(http_req)
    }

    fn request_with_route(uri: &str, key: &str, value: &str) -> Request {
        let mut params = HashMap::new();
        params.insert(key.to_string(), value.to_string());
        request(uri).with_route_params(params)
    }

    #[test]
    fn test_url_param_route_wins_over_query() {
        let req = request_with_route("/things/7?id=99", "id", "7");
        assert_eq!(req.url_param("id"), "7");
    }

    #[test]
    fn test_url_param_falls_back_to_query() {
        let req = request("/search?q=rust");
        assert_eq!(req.url_param("q"), "rust");
    }

    #[test]
    fn test_url_param_missing_is_empty() {
        let req = request("/search");
        assert_eq!(req.url_param("q"), "");
    }

    #[test]
    fn test_url_param_percent_decoding() {
        let req = request("/search?q=hello%20world");
        assert_eq!(req.url_param("q"), "hello world");

        let req = request_with_route("/n/%D1%82%D0%B5%D1%81%D1%82", "name", "%D1%82%D0%B5%D1%81%D1%82");
        assert_eq!(req.url_param("name"), "тест");
    }

    #[test]
    fn test_url_param_decode_failure_returns_raw() {
        // Truncated escape, invalid UTF-8 after decoding
        let req = request("/search?q=%FF%FE");
        assert_eq!(req.url_param("q"), "%FF%FE");
    }

    #[test]
    fn test_url_param_double_encoded_space_normalized() {
        // %2520 decodes to the literal text "%20", which is then a space
        let req = request("/search?q=a%2520b");
        assert_eq!(req.url_param("q"), "a b");
    }

    #[test]
    fn test_url_int_param() {
        let req = request("/page?n=42");
        assert_eq!(req.url_int_param("n").unwrap(), 42);

        let req = request("/page?n=abc");
        assert!(matches!(
            req.url_int_param("n"),
            Err(Error::Parameter { .. })
        ));

        // Absent key parses the empty string and fails, never panics
        let req = request("/page");
        assert!(req.url_int_param("n").is_err());
    }

    #[test]
    fn test_url_int_param_with_default() {
        let req = request("/page?n=42");
        assert_eq!(req.url_int_param_with_default("n", 7), 42);

        let req = request("/page?n=abc");
        assert_eq!(req.url_int_param_with_default("n", 7), 7);

        let req = request("/page");
        assert_eq!(req.url_int_param_with_default("n", 7), 7);
    }

    #[test]
    fn test_url_bool_param_is_total() {
        // "%E2%9C%93" decodes to the check mark
        for truthy in ["true", "yes", "1", "y", "%E2%9C%93"] {
            let req = request(&format!("/x?b={}", truthy));
            assert!(req.url_bool_param("b"), "expected '{}' to be true", truthy);
        }

        for falsy in ["TRUE", "Yes", "0", "no", "2", "on", ""] {
            let req = request(&format!("/x?b={}", falsy));
            assert!(!req.url_bool_param("b"), "expected '{}' to be false", falsy);
        }

        // Absent key
        let req = request("/x");
        assert!(!req.url_bool_param("b"));
    }

    #[test]
    fn test_url_date_param() {
        let req = request("/x?at=2026-08-25T10%3A30%3A00%2B12%3A00");
        let dt = req.url_date_param("at").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-08-25T10:30:00+12:00");

        let req = request("/x?at=not-a-date");
        assert!(req.url_date_param("at").is_err());
    }

    #[test]
    fn test_url_short_date_param() {
        let req = request("/x?on=2026-08-25");
        let date = req.url_short_date_param("on").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 8, 25).unwrap());

        let req = request("/x?on=25/08/2026");
        assert!(req.url_short_date_param("on").is_err());
    }

    #[test]
    fn test_url_unique_prefers_uniqueid() {
        let req = request("/x?uniqueid=ab12cd&ulid=zz99zz");
        assert_eq!(req.url_unique(), "AB12CD");
    }

    #[test]
    fn test_url_unique_falls_back_to_ulid() {
        let req = request("/x?ulid=ab12cd");
        assert_eq!(req.url_unique(), "AB12CD");

        let req = request("/x");
        assert_eq!(req.url_unique(), "");
    }
}
