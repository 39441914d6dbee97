//! Simulated backend and the transport shim that diverts traffic to it.

pub mod interceptor;
pub mod router;
mod routes;

pub use interceptor::{FetchInterceptor, MULTIPART_PLACEHOLDER, multipart_placeholder};
pub use router::{DEFAULT_MOCK_LATENCY, MOCK_API_ERROR, MockRouteError, MockRouter};
