//! Persisted sign-in state
//!
//! The session is two string entries, `token` and `role`. Login writes them,
//! logout removes both together. Nothing is cached in memory: every read goes
//! back to the [`SessionStore`], so a logout in one place is seen everywhere
//! on the next request.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::error::{ClientError, ClientResult};
use crate::models::Role;

/// The persisted key/value pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Backing storage for [`Session`]
pub trait SessionStore: Send + Sync {
    fn load(&self) -> ClientResult<SessionData>;

    fn save(&self, data: &SessionData) -> ClientResult<()>;

    /// Remove `token` and `role` together
    fn clear(&self) -> ClientResult<()>;
}

/// TOML file in the user's config directory
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ClientResult<SessionData> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionData::default())
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content).map_err(|e| {
            ClientError::Session(format!("{}: {}", self.path.display(), e))
        })
    }

    fn save(&self, data: &SessionData) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string(data).map_err(|e| ClientError::Session(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, used by tests and one-shot embedding
#[derive(Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, SessionData>> {
        self.data
            .lock()
            .map_err(|e| ClientError::Session(e.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClientResult<SessionData> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, data: &SessionData) -> ClientResult<()> {
        *self.lock()? = data.clone();
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.lock()? = SessionData::default();
        Ok(())
    }
}

/// Handle to the signed-in state, shared by the HTTP client and the pages
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileSessionStore::new(path)))
    }

    /// Current bearer token, read from storage
    pub fn token(&self) -> ClientResult<Option<String>> {
        Ok(self.store.load()?.token.filter(|t| !t.is_empty()))
    }

    /// Role recorded at login. An unrecognised value reads as no role.
    pub fn role(&self) -> ClientResult<Option<Role>> {
        let raw = self.store.load()?.role;
        Ok(raw.and_then(|r| match r.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::debug!("Ignoring stored role: {}", e);
                None
            }
        }))
    }

    pub fn is_signed_in(&self) -> ClientResult<bool> {
        Ok(self.token()?.is_some())
    }

    /// Store a freshly issued token. Any previous role is dropped until
    /// [`Session::set_role`] records the new one.
    pub fn start(&self, token: &str) -> ClientResult<()> {
        self.store.save(&SessionData {
            token: Some(token.to_string()),
            role: None,
        })
    }

    pub fn set_role(&self, role: Role) -> ClientResult<()> {
        let mut data = self.store.load()?;
        data.role = Some(role.as_str().to_string());
        self.store.save(&data)
    }

    /// Store token and role in one step
    pub fn login(&self, token: &str, role: Role) -> ClientResult<()> {
        self.store.save(&SessionData {
            token: Some(token.to_string()),
            role: Some(role.as_str().to_string()),
        })
    }

    /// Remove both entries
    pub fn logout(&self) -> ClientResult<()> {
        self.store.clear()
    }
}
