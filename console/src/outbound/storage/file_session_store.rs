//! Session store persisted as a JSON object in a single file.
//!
//! File access goes through `cap_std`: the store holds a capability for the
//! parent directory and never touches paths outside it. Writes are staged to
//! a sibling file and renamed into place.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};

use crate::domain::SessionKey;
use crate::domain::ports::{SessionStore, SessionStoreError};

/// File-backed [`SessionStore`].
#[derive(Debug)]
pub struct FileSessionStore {
    directory: Dir,
    file_name: OsString,
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileSessionStore {
    /// Open (creating the parent directory if needed) the store at `path`.
    ///
    /// The file itself is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` has no file name or the parent directory
    /// cannot be created or opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} does not name a file", path.display()),
                )
            })?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Dir::create_ambient_dir_all(parent, ambient_authority())?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        Ok(Self {
            directory,
            file_name,
            path: path.to_owned(),
            guard: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionStoreError> {
        let raw = match self.directory.read_to_string(&self.file_name) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(self.unavailable(&error)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            SessionStoreError::corrupt(format!("{}: {error}", self.path.display()))
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionStoreError> {
        let mut staged = OsString::from(".");
        staged.push(&self.file_name);
        staged.push(".tmp");
        let json = serde_json::to_vec_pretty(entries).map_err(|error| {
            SessionStoreError::unavailable(format!("{}: {error}", self.path.display()))
        })?;
        self.directory
            .write(&staged, json)
            .map_err(|error| self.unavailable(&error))?;
        self.directory
            .rename(&staged, &self.directory, &self.file_name)
            .map_err(|error| self.unavailable(&error))
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), SessionStoreError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        if change(&mut entries) {
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Delete the backing file; a missing file is already discarded.
    fn discard(&self) -> Result<(), SessionStoreError> {
        match self.directory.remove_file(&self.file_name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.unavailable(&error)),
        }
    }

    fn unavailable(&self, error: &io::Error) -> SessionStoreError {
        SessionStoreError::unavailable(format!("{}: {error}", self.path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, SessionStoreError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key.as_str()))
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionStoreError> {
        self.update(|entries| {
            entries.insert(key.as_str().to_owned(), value.to_owned());
            true
        })
    }

    /// An unreadable file holds nothing worth keeping, so removing from it
    /// deletes the file instead of failing.
    fn remove(&self, key: SessionKey) -> Result<(), SessionStoreError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.load() {
            Err(SessionStoreError::Corrupt { message }) => {
                warn!(%key, reason = %message, "discarding unreadable session file");
                return self.discard();
            }
            loaded => loaded?,
        };
        if entries.remove(key.as_str()).is_some() {
            debug!(%key, "removed session key");
            self.save(&entries)?;
        }
        Ok(())
    }
}
