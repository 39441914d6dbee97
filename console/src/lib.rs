//! Request layer for the Pawstay admin console and partner portal.
//!
//! The crate follows a ports-and-adapters layout: `domain` owns the response
//! envelope, the authenticated request wrapper, session teardown and the
//! page-level services; `outbound` holds the reqwest transport, session
//! storage and the simulated backend; `inbound` serves the simulated backend
//! over HTTP.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod runtime;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::ClientSettings;
pub use runtime::ConsoleRuntime;
