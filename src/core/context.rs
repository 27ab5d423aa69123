//! Per-request context and the Bucket.
//!
//! One [`RequestContext`] is created per inbound request, owned by that
//! request's handler, and destroyed when the request completes. Construction
//! eagerly populates the Bucket with the common variables every template
//! expects, performing exactly one identity lookup; there is no lazy
//! "populated" state to trip over later.
//!
//! None of these types are safe to retain beyond the request's lifetime.
//! Background work must copy out the values it needs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Datelike, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::SiteConfig;
use crate::templates::{FuncRegistry, TemplateEngine};

use super::error::{Error, Result};
use super::request::Request;

/// Bucket keys populated on every request.
pub mod keys {
    pub const IS_LOGGED_IN: &str = "IsLoggedIn";
    pub const LOGGED_IN_USER: &str = "LoggedInUser";
    pub const CURRENT_URL: &str = "CurrentURL";
    pub const CURRENT_FULL_URL: &str = "CurrentFullURL";
    pub const WEBSITE_BASE_URL: &str = "WebsiteBaseURL";
    pub const NOW: &str = "Now";
    pub const YEAR: &str = "Year";
}

/// Authenticated user as surfaced by the identity provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Identity provider seam. Resolves the current user for a request.
pub trait IdentityProvider: Send + Sync {
    /// Look up the authenticated user, if any.
    fn current_user(&self, request: &Request) -> Result<Option<User>>;
}

/// Key/value cache seam. Calls are synchronous round trips that may fail.
pub trait Cache: Send + Sync {
    /// Fetch a value; `Ok(None)` is a miss, `Err` is a transport failure.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value with a time-to-live.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// Event bus seam. Fans a categorized payload out to long-poll listeners.
pub trait EventBus: Send + Sync {
    /// Deliver `payload` to every listener subscribed to `category`.
    fn publish(&self, category: &str, payload: &Value) -> Result<()>;
}

/// Process-wide collaborators shared by every request.
///
/// Cheap to clone; everything inside is behind an `Arc`. The template helper
/// registry is built once here and injected, never mutated afterwards.
#[derive(Clone)]
pub struct Services {
    pub site: Arc<SiteConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub cache: Arc<dyn Cache>,
    pub engine: Arc<dyn TemplateEngine>,
    pub funcs: Arc<FuncRegistry>,
    pub events: Option<Arc<dyn EventBus>>,
}

impl Services {
    /// Wire up the shared collaborators and build the helper registry.
    pub fn new(
        site: SiteConfig,
        identity: Arc<dyn IdentityProvider>,
        cache: Arc<dyn Cache>,
        engine: Arc<dyn TemplateEngine>,
    ) -> Self {
        let site = Arc::new(site);
        let funcs = Arc::new(FuncRegistry::standard(&site));
        Self {
            site,
            identity,
            cache,
            engine,
            funcs,
            events: None,
        }
    }

    /// Attach an event bus. Without one, [`RequestContext::publish`] fails.
    pub fn with_event_bus(mut self, events: Arc<dyn EventBus>) -> Self {
        self.events = Some(events);
        self
    }
}

/// Request-scoped key/value accumulator feeding template rendering.
///
/// Values are stored as `serde_json::Value` so one representation serves
/// both the template engine and JSON output. Last write wins per key.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Bucket {
    entries: HashMap<String, Value>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under `key`, replacing any previous value.
    ///
    /// A value that fails to serialize is stored as null rather than
    /// failing the request.
    pub fn add(&mut self, key: &str, value: impl Serialize) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("bucket value for '{}' not serializable: {}", key, e);
                Value::Null
            }
        };
        self.entries.insert(key.to_string(), value);
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get a string value by key, empty if absent or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.entries
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

/// One in-flight request: the inbound request, the negotiated scheme, the
/// Bucket, and handles to the shared collaborators.
pub struct RequestContext {
    request: Request,
    services: Services,
    scheme: &'static str,
    bucket: Bucket,
    request_id: String,
    started_at: Instant,
}

impl RequestContext {
    /// Build a context for `request` and eagerly populate the common
    /// Bucket variables. Performs exactly one identity lookup.
    pub fn new(request: Request, services: Services) -> Result<Self> {
        let scheme = negotiate_scheme(&services.site, &request);

        let mut bucket = Bucket::new();
        let user = services.identity.current_user(&request)?;

        bucket.add(keys::IS_LOGGED_IN, user.is_some());
        if let Some(user) = &user {
            bucket.add(keys::LOGGED_IN_USER, user);
        }

        let base_url = format!("{}://{}", scheme, request.host());
        let current_url = request.path_and_query();
        bucket.add(keys::CURRENT_URL, &current_url);
        bucket.add(
            keys::CURRENT_FULL_URL,
            format!("{}{}", base_url, current_url),
        );
        bucket.add(keys::WEBSITE_BASE_URL, &base_url);

        let now = Utc::now();
        bucket.add(keys::NOW, now.to_rfc3339_opts(SecondsFormat::Secs, true));
        bucket.add(keys::YEAR, now.year());

        Ok(Self {
            request,
            services,
            scheme,
            bucket,
            request_id: short_request_id(),
            started_at: Instant::now(),
        })
    }

    /// Add a value to the Bucket. Idempotent per key, last write wins.
    pub fn add(&mut self, key: &str, value: impl Serialize) {
        self.bucket.add(key, value);
    }

    /// Get the inbound request.
    #[inline]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Get the Bucket.
    #[inline]
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Get the shared collaborators.
    #[inline]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// The negotiated scheme, `http` or `https`.
    #[inline]
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    /// Scheme-aware absolute base URL for this request.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.request.host())
    }

    /// Scheme-aware absolute URL of this request, including the query.
    pub fn full_url(&self) -> String {
        format!("{}{}", self.base_url(), self.request.path_and_query())
    }

    /// Short id correlating this request's log lines.
    #[inline]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Elapsed time since the context was created, in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64() * 1000.0
    }

    /// Fetch a cached value; a miss yields an empty string.
    pub fn cache_get(&self, key: &str) -> Result<String> {
        Ok(self.services.cache.get(key)?.unwrap_or_default())
    }

    /// Store a cached value with a time-to-live.
    pub fn cache_set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.services.cache.set(key, value, ttl)
    }

    /// Publish an event to the bus under `category`.
    ///
    /// An upstream error is returned when no bus was configured, so a
    /// handler relying on event delivery finds out rather than silently
    /// dropping the event.
    pub fn publish(&self, category: &str, payload: &impl Serialize) -> Result<()> {
        let bus = self
            .services
            .events
            .as_deref()
            .ok_or_else(|| Error::upstream("events", "event bus not initialised"))?;
        let payload = serde_json::to_value(payload)
            .map_err(|e| Error::upstream("events", e.to_string()))?;
        bus.publish(category, &payload)
    }
}

/// Decide the request scheme.
///
/// Precedence: configured force-HTTPS mode, then a reverse-proxy
/// `X-Forwarded-Proto: https`, then the connection's own TLS state,
/// else plain `http`.
fn negotiate_scheme(site: &SiteConfig, request: &Request) -> &'static str {
    if site.force_https {
        return "https";
    }
    if request
        .forwarded_proto()
        .map(|p| p.eq_ignore_ascii_case("https"))
        .unwrap_or(false)
    {
        return "https";
    }
    if request.is_tls() {
        return "https";
    }
    "http"
}

/// Short random id for log correlation.
fn short_request_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..12].to_string()
}
