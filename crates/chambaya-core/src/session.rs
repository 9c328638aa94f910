//! Authentication session store.
//!
//! Holds the bearer token and the current user, persists them to
//! `<base>/auth-session-storage.json` with restricted permissions (0600),
//! and tracks whether the persisted copy has been loaded ("rehydrated").
//! Tokens are never logged.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chambaya_types::User;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::paths;

/// Storage key of the persisted session.
pub const SESSION_STORAGE_NAME: &str = "auth-session-storage";

/// Version stamped into the persisted document.
const PERSIST_VERSION: u32 = 0;

/// Persisted session fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// On-disk document: `{"state": {...}, "version": 0}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: PersistedState,
    #[serde(default)]
    pub version: u32,
}

/// Key-value backend holding the serialized session.
pub trait SessionStorage: Send + Sync {
    /// Reads the persisted session, `None` if nothing was stored.
    ///
    /// # Errors
    /// Returns an error if the stored copy cannot be read or decoded.
    fn load(&self) -> Result<Option<PersistedSession>>;

    /// Replaces the persisted session.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Removes the persisted session. Erasing nothing is not an error.
    ///
    /// # Errors
    /// Returns an error if the backend refuses the removal.
    fn erase(&self) -> Result<()>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<PersistedSession>> {
        (**self).load()
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        (**self).save(session)
    }

    fn erase(&self) -> Result<()> {
        (**self).erase()
    }
}

/// JSON file storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage file inside `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{SESSION_STORAGE_NAME}.json")),
        }
    }

    /// Storage file inside the ChambaYa home.
    pub fn in_home() -> Self {
        Self::new(&paths::chambaya_home())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<PersistedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        let session = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    fn erase(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

/// In-process storage, mostly for tests and embedders without a disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with a raw document.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw stored document, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedSession>> {
        self.raw()
            .map(|raw| serde_json::from_str(&raw).context("Failed to parse stored session"))
            .transpose()
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        let raw = serde_json::to_string(session).context("Failed to serialize session")?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }

    fn erase(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Immutable view of the session at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<User>,
    pub rehydrated: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Session store shared by the API client and the front end.
///
/// State lives in a `watch` channel: every write replaces token and user
/// in one step, so subscribers never observe a half-updated pair.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    state: watch::Sender<SessionSnapshot>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.is_authenticated())
            .field("rehydrated", &state.rehydrated)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an empty, not yet rehydrated store.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            storage: Box::new(storage),
            state,
        }
    }

    /// Store backed by the session file in the ChambaYa home.
    pub fn open_default() -> Self {
        Self::new(FileStorage::in_home())
    }

    /// Loads the persisted copy (if any) and marks the store rehydrated.
    ///
    /// Runs at most once; later calls are no-ops. An unreadable copy is
    /// logged and treated as "no session".
    pub fn rehydrate(&self) {
        if self.is_rehydrated() {
            tracing::debug!("session already rehydrated");
            return;
        }

        let persisted = match self.storage.load() {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "discarding unreadable session");
                None
            }
        };

        self.state.send_modify(|s| {
            if let Some(p) = persisted {
                s.token = p.state.token;
                s.user = p.state.user;
            }
            s.rehydrated = true;
        });
        tracing::debug!(authenticated = self.snapshot().is_authenticated(), "session rehydrated");
    }

    pub fn set_rehydrated(&self, rehydrated: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.rehydrated != rehydrated;
            s.rehydrated = rehydrated;
            changed
        });
    }

    /// Replaces token and user together, then persists them.
    ///
    /// The in-memory session is updated even if persisting fails.
    ///
    /// # Errors
    /// Returns an error if the persisted copy could not be written.
    pub fn set_auth(&self, token: impl Into<String>, user: User) -> Result<()> {
        let token = token.into();
        let persisted = PersistedSession {
            state: PersistedState {
                token: Some(token.clone()),
                user: Some(user.clone()),
            },
            version: PERSIST_VERSION,
        };

        self.state.send_modify(|s| {
            s.token = Some(token);
            s.user = Some(user);
        });
        tracing::info!("session stored");

        self.storage.save(&persisted).context("persist session")
    }

    /// Replaces the user and keeps the current token (profile edits).
    ///
    /// # Errors
    /// Returns an error if there is no token or persisting fails.
    pub fn update_user(&self, user: User) -> Result<()> {
        let Some(token) = self.token() else {
            anyhow::bail!("No active session to update");
        };
        self.set_auth(token, user)
    }

    /// Erases the persisted copy, then clears the in-memory session.
    ///
    /// Clearing memory does not depend on the erase succeeding.
    pub fn clear_auth(&self) {
        if let Err(e) = self.storage.erase() {
            tracing::warn!(error = %format!("{e:#}"), "failed to erase persisted session");
        }
        self.state.send_modify(|s| {
            s.token = None;
            s.user = None;
        });
        tracing::info!("session cleared");
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_rehydrated(&self) -> bool {
        self.state.borrow().rehydrated
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Resolves once the persisted copy has been loaded.
    pub async fn wait_rehydrated(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|s| s.rehydrated).await;
    }
}
