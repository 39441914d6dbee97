//! HTTP inbound adapter serving the simulated backend.

pub mod mock_api;

pub use mock_api::{MockApiState, configure};
