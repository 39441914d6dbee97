//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;
use url::Url;

use crate::domain::ports::{
    ErrorNotice, ErrorPresenter, HttpTransport, InMemorySessionStore, Navigator, SessionStore,
    Sleeper, TransportError, TransportRequest, TransportResponse,
};
use crate::domain::{ApiClient, DEFAULT_REDIRECT_DELAY, SessionKey, SessionTeardown};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Navigator that remembers every destination.
#[derive(Debug)]
pub struct RecordingNavigator {
    current: Mutex<String>,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Navigator positioned on `path`.
    pub fn new(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_owned()),
            visits: Mutex::new(Vec::new()),
        }
    }

    /// Move to `path` without recording a visit.
    pub fn set_current(&self, path: &str) {
        *lock(&self.current) = path.to_owned();
    }

    /// Destinations navigated to, oldest first.
    pub fn visits(&self) -> Vec<String> {
        lock(&self.visits).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        lock(&self.current).clone()
    }

    fn navigate(&self, destination: &str) {
        lock(&self.visits).push(destination.to_owned());
        *lock(&self.current) = destination.to_owned();
    }
}

/// Sleeper that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl Sleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that records requested durations and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper(Mutex<Vec<Duration>>);

impl RecordingSleeper {
    /// Durations requested so far.
    pub fn durations(&self) -> Vec<Duration> {
        lock(&self.0).clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.0).push(duration);
    }
}

/// Presenter that keeps every notice.
#[derive(Debug, Default)]
pub struct RecordingPresenter(Mutex<Vec<ErrorNotice>>);

impl RecordingPresenter {
    /// Notices presented so far.
    pub fn notices(&self) -> Vec<ErrorNotice> {
        lock(&self.0).clone()
    }
}

impl ErrorPresenter for RecordingPresenter {
    fn present(&self, notice: &ErrorNotice) {
        lock(&self.0).push(notice.clone());
    }
}

/// Transport answering from a queue of scripted outcomes.
///
/// Requests are recorded; once the queue is empty every call fails with a
/// connection error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn respond_json(&self, status: u16, body: Value) -> &Self {
        lock(&self.outcomes).push_back(Ok(TransportResponse::json(status, &body)));
        self
    }

    /// Queue a response with a raw body.
    pub fn respond_raw(&self, status: u16, body: &[u8]) -> &Self {
        lock(&self.outcomes).push_back(Ok(TransportResponse {
            status,
            body: body.to_vec(),
        }));
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: TransportError) -> &Self {
        lock(&self.outcomes).push_back(Err(error));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<TransportRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        lock(&self.requests).push(request);
        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::connect("no scripted response left")))
    }
}

/// Transport whose requests never complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct StalledTransport;

#[async_trait]
impl HttpTransport for StalledTransport {
    async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, TransportError> {
        std::future::pending().await
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(fixed_now())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Instant used by [`FixedClock::default`].
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A client wired to recording doubles.
pub struct ClientHarness<T> {
    /// Session store the client reads from.
    pub store: Arc<InMemorySessionStore>,
    /// Navigator receiving redirects.
    pub navigator: Arc<RecordingNavigator>,
    /// Presenter receiving application errors.
    pub presenter: Arc<RecordingPresenter>,
    /// Transport the client sends through.
    pub transport: Arc<T>,
    /// Client under test.
    pub client: Arc<ApiClient>,
}

impl<T: HttpTransport + 'static> ClientHarness<T> {
    /// Harness on page `page`, sending through `transport`.
    pub fn new(page: &str, transport: T) -> Self {
        let store = Arc::new(InMemorySessionStore::default());
        let navigator = Arc::new(RecordingNavigator::new(page));
        let presenter = Arc::new(RecordingPresenter::default());
        let transport = Arc::new(transport);
        let teardown = SessionTeardown::new(
            store.clone(),
            navigator.clone(),
            Arc::new(ImmediateSleeper),
            DEFAULT_REDIRECT_DELAY,
        );
        let base_url = Url::parse("http://console.test/").unwrap_or_else(|error| {
            panic!("static base URL must parse: {error}");
        });
        let client = Arc::new(ApiClient::new(
            base_url,
            transport.clone(),
            teardown,
            presenter.clone(),
        ));
        Self {
            store,
            navigator,
            presenter,
            transport,
            client,
        }
    }

    /// Store `token` as the access token.
    pub fn with_token(self, token: &str) -> Self {
        if let Err(error) = self.store.set(SessionKey::AccessToken, token) {
            panic!("in-memory store rejected token: {error}");
        }
        self
    }
}
