//! Tokio-backed [`Sleeper`].

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::Sleeper;

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
