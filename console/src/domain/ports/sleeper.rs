//! Driven port for timed waits.
//!
//! Redirect delays and simulated latency go through this port so tests can
//! run them instantly.

use std::time::Duration;

use async_trait::async_trait;

/// Waits for a duration.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Resolve after `duration`.
    async fn sleep(&self, duration: Duration);
}
