//! Wires the concrete adapters into an [`ApiClient`] and its services.

use std::path::PathBuf;
use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use crate::config::ClientSettings;
use crate::domain::ports::{HttpTransport, InMemorySessionStore, Navigator, SessionStore};
use crate::domain::{
    ApiClient, AuthService, ChatService, PartnerOnboardingService, ProfileService,
    PromotionService, SessionTeardown,
};
use crate::outbound::simulation::{FetchInterceptor, MockRouter};
use crate::outbound::{
    FileSessionStore, ReqwestTransport, TokioSleeper, TracingErrorPresenter, TracingNavigator,
};

/// Failures while assembling the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// `base_url` is not a URL.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The session file could not be opened.
    #[error("failed to open session file {path}: {source}")]
    SessionStore {
        /// Configured path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Fully wired client with its page-level services.
pub struct ConsoleRuntime {
    client: Arc<ApiClient>,
    interceptor: Arc<FetchInterceptor>,
    navigator: Arc<TracingNavigator>,
}

impl ConsoleRuntime {
    /// Build the runtime from `settings`.
    ///
    /// The transport is always wrapped in a [`FetchInterceptor`]; it is
    /// installed only when `use_mock_api` is set.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the base URL is malformed, the HTTP
    /// client cannot be built or the session file cannot be opened.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, RuntimeError> {
        let base_url = settings.base_url()?;
        let reqwest: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(settings.request_timeout())?);
        let store = open_store(settings)?;
        let navigator = Arc::new(TracingNavigator::new(settings.current_path()));
        let sleeper = Arc::new(TokioSleeper);

        let router = MockRouter::new(
            Arc::new(DefaultClock),
            sleeper.clone(),
            settings.mock_latency(),
        );
        let interceptor = Arc::new(FetchInterceptor::new(
            reqwest,
            router,
            navigator.clone(),
            settings.use_mock_api,
        ));
        if settings.use_mock_api {
            interceptor.install();
        }

        let teardown = SessionTeardown::new(
            store,
            navigator.clone(),
            sleeper,
            settings.redirect_delay(),
        );
        let client = Arc::new(ApiClient::new(
            base_url,
            interceptor.clone(),
            teardown,
            Arc::new(TracingErrorPresenter),
        ));
        info!(
            base_url = %client.base_url(),
            mock_api = settings.use_mock_api,
            page = settings.current_path(),
            "console runtime ready"
        );
        Ok(Self {
            client,
            interceptor,
            navigator,
        })
    }

    /// Shared request wrapper.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Interception shim around the real transport.
    pub fn interceptor(&self) -> &Arc<FetchInterceptor> {
        &self.interceptor
    }

    /// Session teardown handler.
    pub fn teardown(&self) -> &SessionTeardown {
        self.client.teardown()
    }

    /// Path of the page the client is on.
    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// Login and logout.
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone())
    }

    /// Chat inbox operations.
    pub fn chat(&self) -> ChatService {
        ChatService::new(self.client.clone())
    }

    /// Promotion management.
    pub fn promotions(&self) -> PromotionService {
        PromotionService::new(self.client.clone())
    }

    /// Partner onboarding uploads and submission.
    pub fn onboarding(&self) -> PartnerOnboardingService {
        PartnerOnboardingService::new(self.client.clone())
    }

    /// Admin profile page.
    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.client.clone())
    }
}

fn open_store(settings: &ClientSettings) -> Result<Arc<dyn SessionStore>, RuntimeError> {
    let Some(path) = settings.session_file() else {
        return Ok(Arc::new(InMemorySessionStore::default()));
    };
    let store = FileSessionStore::open(path).map_err(|source| RuntimeError::SessionStore {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoginCredentials, Portal, UserRole};
    use pagination::PageRequest;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn settings() -> ClientSettings {
        ClientSettings {
            base_url: Some("http://127.0.0.1:9/".to_owned()),
            use_mock_api: true,
            session_file: None,
            current_path: Some("/admin".to_owned()),
            mock_latency_ms: Some(0),
            redirect_delay_ms: Some(0),
            request_timeout_secs: Some(1),
        }
    }

    #[rstest]
    fn mock_mode_installs_the_interceptor(settings: ClientSettings) {
        let runtime = ConsoleRuntime::from_settings(&settings).expect("runtime builds");
        assert!(runtime.interceptor().is_installed());
        assert_eq!(runtime.current_path(), "/admin");
    }

    #[rstest]
    fn live_mode_leaves_the_interceptor_out(mut settings: ClientSettings) {
        settings.use_mock_api = false;
        let runtime = ConsoleRuntime::from_settings(&settings).expect("runtime builds");
        assert!(!runtime.interceptor().is_installed());
    }

    #[rstest]
    fn malformed_base_urls_are_rejected(mut settings: ClientSettings) {
        settings.base_url = Some("::nope".to_owned());
        let error = ConsoleRuntime::from_settings(&settings)
            .err()
            .expect("bad url should fail");
        assert!(matches!(error, RuntimeError::InvalidBaseUrl(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn simulated_login_persists_to_the_session_file(mut settings: ClientSettings) {
        let dir = TempDir::new().expect("temp dir");
        let session_file = dir.path().join("session.json");
        settings.session_file = Some(session_file.clone());
        let runtime = ConsoleRuntime::from_settings(&settings).expect("runtime builds");
        let credentials =
            LoginCredentials::try_from_parts("admin@pawstay.kr", "pw").expect("valid credentials");

        let envelope = runtime.auth().login(&credentials, Portal::Admin).await;

        assert!(envelope.success, "{envelope:?}");
        let reopened = ConsoleRuntime::from_settings(&settings).expect("runtime builds");
        let user = reopened.auth().current_user().expect("user persisted");
        assert_eq!(user.role, UserRole::Admin);
        assert!(session_file.exists());
    }

    #[rstest]
    #[tokio::test]
    async fn services_share_the_simulated_backend(settings: ClientSettings) {
        let runtime = ConsoleRuntime::from_settings(&settings).expect("runtime builds");

        let conversations = runtime
            .chat()
            .fetch_conversations(PageRequest::default())
            .await;
        let promotions = runtime.promotions().list(PageRequest::default()).await;
        let profile = runtime.profile().get_profile().await;

        assert!(conversations.success);
        assert!(promotions.success);
        assert_eq!(profile.data.map(|p| p.email).as_deref(), Some("admin@pawstay.kr"));
    }
}
