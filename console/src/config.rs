//! Client configuration loaded via OrthoConfig.
//!
//! Every field can be set from the environment with the `PAWSTAY_` prefix,
//! e.g. `PAWSTAY_BASE_URL` or `PAWSTAY_USE_MOCK_API=true`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_REDIRECT_DELAY;
use crate::outbound::simulation::DEFAULT_MOCK_LATENCY;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_CURRENT_PATH: &str = "/admin";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings for the console client runtime.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAWSTAY")]
pub struct ClientSettings {
    /// Backend base URL; request paths are resolved against it.
    pub base_url: Option<String>,
    /// Answer admin API calls from the simulated backend.
    #[ortho_config(default = false)]
    pub use_mock_api: bool,
    /// Where to persist the session. In memory when unset.
    pub session_file: Option<PathBuf>,
    /// Page the client starts on; decides the portal and interception.
    pub current_path: Option<String>,
    /// Simulated backend latency in milliseconds.
    pub mock_latency_ms: Option<u64>,
    /// Delay before the login redirect after a session expires.
    pub redirect_delay_ms: Option<u64>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Base URL with a trailing slash so relative paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Configured session file, if any.
    pub fn session_file(&self) -> Option<&Path> {
        self.session_file.as_deref()
    }

    /// Starting page, defaulting to the admin dashboard.
    pub fn current_path(&self) -> &str {
        self.current_path.as_deref().unwrap_or(DEFAULT_CURRENT_PATH)
    }

    /// Simulated backend latency.
    pub fn mock_latency(&self) -> Duration {
        self.mock_latency_ms
            .map_or(DEFAULT_MOCK_LATENCY, Duration::from_millis)
    }

    /// Delay before the login redirect.
    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay_ms
            .map_or(DEFAULT_REDIRECT_DELAY, Duration::from_millis)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        )
    }
}
