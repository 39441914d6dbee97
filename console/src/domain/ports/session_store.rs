//! Driven port for the persistent key-value session store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::define_port_error;
use crate::domain::session::SessionKey;

define_port_error! {
    /// Errors raised by session storage.
    pub enum SessionStoreError {
        /// The backing storage could not be read or written.
        Unavailable { message: String } =>
            "session storage unavailable: {message}",
        /// Stored data could not be decoded.
        Corrupt { message: String } =>
            "session storage corrupt: {message}",
    }
}

/// Port for reading and writing persisted session values.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Read one value.
    fn get(&self, key: SessionKey) -> Result<Option<String>, SessionStoreError>;

    /// Write one value.
    fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionStoreError>;

    /// Delete one value; deleting a missing key succeeds.
    fn remove(&self, key: SessionKey) -> Result<(), SessionStoreError>;
}

/// Process-local store, used in tests and as the fallback when no session
/// file is configured.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<BTreeMap<SessionKey, String>>,
}

impl InMemorySessionStore {
    /// Store pre-filled with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (SessionKey, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key, value.to_owned()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    /// Keys currently holding a value.
    pub fn keys(&self) -> Vec<SessionKey> {
        self.lock().keys().copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SessionKey, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, SessionStoreError> {
        Ok(self.lock().get(&key).cloned())
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionStoreError> {
        self.lock().insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<(), SessionStoreError> {
        self.lock().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_store_round_trips_values() {
        let store = InMemorySessionStore::default();
        store.set(SessionKey::AccessToken, "t-1").expect("set");
        assert_eq!(
            store.get(SessionKey::AccessToken).expect("get").as_deref(),
            Some("t-1")
        );
        store.remove(SessionKey::AccessToken).expect("remove");
        store.remove(SessionKey::AccessToken).expect("second remove is a no-op");
        assert!(store.keys().is_empty());
    }
}
