//! Navigator for headless runs: tracks the current page and logs moves.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::domain::ports::Navigator;

/// [`Navigator`] that records the location in memory and logs each move.
#[derive(Debug)]
pub struct TracingNavigator {
    current: Mutex<String>,
}

impl TracingNavigator {
    /// Navigator starting on `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(path.into()),
        }
    }
}

impl Navigator for TracingNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, destination: &str) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        info!(from = %current, to = destination, "navigating");
        destination.clone_into(&mut *current);
    }
}
