//! Ends a session after an authentication failure or an explicit logout.
//!
//! Teardown clears every persisted session key synchronously, then sends the
//! user to their portal's login page. After an authentication failure the
//! navigation waits [`DEFAULT_REDIRECT_DELAY`] so the session-expired notice
//! stays visible; only one redirect is pending at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::portal::Portal;
use super::ports::{Navigator, SessionStore, Sleeper};
use super::session::SessionKey;

/// Delay between an authentication failure and the login redirect.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Session teardown handle. Clones share the pending-redirect state.
#[derive(Clone)]
pub struct SessionTeardown {
    inner: Arc<TeardownInner>,
}

struct TeardownInner {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    sleeper: Arc<dyn Sleeper>,
    redirect_delay: Duration,
    redirect_pending: Arc<AtomicBool>,
    redirect_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionTeardown {
    /// Build a teardown handler.
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        sleeper: Arc<dyn Sleeper>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(TeardownInner {
                store,
                navigator,
                sleeper,
                redirect_delay,
                redirect_pending: Arc::new(AtomicBool::new(false)),
                redirect_task: Mutex::new(None),
            }),
        }
    }

    /// Session store the handler clears.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    /// Navigator used for redirects.
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// Remove every persisted session key.
    ///
    /// Failures are logged and the remaining keys are still attempted.
    /// Returns how many keys could not be removed.
    pub fn clear_session(&self) -> usize {
        let mut failures = 0;
        for key in SessionKey::ALL {
            if let Err(error) = self.inner.store.remove(key) {
                failures += 1;
                warn!(key = %key, error = %error, "failed to clear session key");
            }
        }
        failures
    }

    /// Handle an authentication failure.
    ///
    /// Clears the session now and schedules one delayed redirect to the login
    /// page of the portal the user is on. Fire-and-forget; use
    /// [`SessionTeardown::settled`] to wait for the redirect.
    pub fn handle_authentication_failure(&self) {
        self.clear_session();
        let destination = Portal::from_path(&self.inner.navigator.current_path()).login_page();

        if self.inner.redirect_pending.swap(true, Ordering::AcqRel) {
            debug!(destination, "login redirect already scheduled");
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!(destination, "no async runtime; redirecting without delay");
            self.inner.navigator.navigate(destination);
            self.inner.redirect_pending.store(false, Ordering::Release);
            return;
        };

        let navigator = Arc::clone(&self.inner.navigator);
        let sleeper = Arc::clone(&self.inner.sleeper);
        let pending = Arc::clone(&self.inner.redirect_pending);
        let delay = self.inner.redirect_delay;
        info!(destination, delay = ?delay, "session ended; scheduling login redirect");
        let task = runtime.spawn(async move {
            sleeper.sleep(delay).await;
            navigator.navigate(destination);
            pending.store(false, Ordering::Release);
        });
        *self.lock_task() = Some(task);
    }

    /// Explicit logout: clear the session and go to the login page at once.
    pub fn logout(&self) {
        self.clear_session();
        let destination = Portal::from_path(&self.inner.navigator.current_path()).login_page();
        info!(destination, "logged out");
        self.inner.navigator.navigate(destination);
    }

    /// Whether a login redirect is waiting to fire.
    pub fn redirect_pending(&self) -> bool {
        self.inner.redirect_pending.load(Ordering::Acquire)
    }

    /// Wait for a scheduled redirect, if any, to complete.
    pub async fn settled(&self) {
        let task = self.lock_task().take();
        if let Some(task) = task {
            if let Err(error) = task.await {
                warn!(error = %error, "login redirect task failed");
            }
        }
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .redirect_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
