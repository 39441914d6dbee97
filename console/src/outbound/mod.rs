//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest transport
//! - **storage**: file-backed session store
//! - **simulation**: mock router and the interception shim
//! - **navigation**, **presenter**, **sleeper**: headless adapters used by
//!   the CLI and the mock server
//!
//! Adapters translate between domain types and infrastructure. They hold no
//! business rules.

pub mod http;
pub mod navigation;
pub mod presenter;
pub mod simulation;
pub mod sleeper;
pub mod storage;

pub use http::ReqwestTransport;
pub use navigation::TracingNavigator;
pub use presenter::TracingErrorPresenter;
pub use sleeper::TokioSleeper;
pub use storage::FileSessionStore;
