//! Request-scoped core types: errors, request/response values, the
//! per-request context and URL parameter extraction.

pub mod context;
pub mod error;
pub mod params;
pub mod request;
pub mod response;

pub use context::{Bucket, Cache, EventBus, IdentityProvider, RequestContext, Services, User};
pub use error::{Error, Result};
pub use request::Request;
pub use response::Response;
