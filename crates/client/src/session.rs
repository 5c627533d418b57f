//! Session storage for the bearer token and cached user profile.
//!
//! The client never reaches for ambient storage: a [`Session`] is handed to the
//! [`ApiClientBuilder`](crate::ApiClientBuilder) and everything token-related
//! flows through it.
//!
//! # Keys
//!
//! - `token` - opaque bearer credential
//! - `user` - JSON serialization of the signed-in user's profile
//!
//! Both are written together on login and removed together on logout or on a
//! 401 response.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the serialized user profile.
pub const USER_KEY: &str = "user";

/// Errors raised by session stores.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("corrupt session file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cached user could not be encoded or decoded.
    #[error("invalid session user: {0}")]
    InvalidUser(#[source] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("session store lock poisoned")]
    Poisoned,
}

/// String-keyed storage scoped to one signed-in session.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// In-process session store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.read().map_err(|_| SessionError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().map_err(|_| SessionError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().map_err(|_| SessionError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Session store persisted as a flat JSON object in a file.
///
/// A missing file is an empty store. Writes go to a temporary file that is
/// then renamed over the original, so an interrupted write never leaves a
/// half-written session behind.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<HashMap<String, String>, SessionError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if data.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&data).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        let io_error = |path: &Path, source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let data = serde_json::to_string_pretty(entries).map_err(SessionError::InvalidUser)?;

        let tmp_path = self.path.with_extension("json.tmp");
        write_private(&tmp_path, data.as_bytes()).map_err(|e| io_error(&tmp_path, e))?;

        fs::rename(&tmp_path, &self.path).map_err(|e| io_error(&self.path, e))
    }
}

/// Write `data` to a fresh file readable only by its owner.
///
/// The file holds a bearer credential, so the mode is set at creation.
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    // A leftover temp file keeps its old mode on open; remove it first
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut entries = self.read()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

/// Handle on the session state shared by the client and the host application.
///
/// Cloning is cheap; all clones see the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Wrap a session store.
    #[must_use]
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wrap an already shared session store.
    #[must_use]
    pub fn from_store(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A session backed by a fresh [`MemorySessionStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// The stored bearer token. Blank tokens count as absent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>, SessionError> {
        Ok(self
            .store
            .get(TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from))
    }

    /// The cached user profile, decoded as `T`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidUser` if the cached JSON does not match `T`.
    pub fn user<T: DeserializeOwned>(&self) -> Result<Option<T>, SessionError> {
        self.store
            .get(USER_KEY)?
            .map(|raw| serde_json::from_str(&raw).map_err(SessionError::InvalidUser))
            .transpose()
    }

    /// Store the token and user of a fresh login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the user cannot be serialized or the store
    /// cannot be written.
    pub fn save<U: Serialize + ?Sized>(&self, token: &str, user: &U) -> Result<(), SessionError> {
        let user = serde_json::to_string(user).map_err(SessionError::InvalidUser)?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user)
    }

    /// Remove the token and user. Safe to call repeatedly.
    ///
    /// Both keys are attempted even if the first removal fails.
    ///
    /// # Errors
    ///
    /// Returns the first `SessionError` encountered.
    pub fn clear(&self) -> Result<(), SessionError> {
        let token = self.store.remove(TOKEN_KEY);
        let user = self.store.remove(USER_KEY);
        token.and(user)
    }

    /// Whether a token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
