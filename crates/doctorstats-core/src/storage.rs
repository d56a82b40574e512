//! Durable client-side storage for the session token
//!
//! The token lives under a fixed key in `<data_dir>/storage.json`, so it
//! survives restarts. The user profile is never written here.

use crate::error::ClientError;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key the session token is stored under
pub const TOKEN_KEY: &str = "token";

/// File name of the key/value store inside the data directory
pub const STORAGE_FILE: &str = "storage.json";

/// Persistence for the one session token
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<(), ClientError>;
    fn remove(&self) -> Result<(), ClientError>;
}

/// JSON key/value file, one entry per key
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORAGE_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or corrupt file reads as empty
    fn load(&self) -> BTreeMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt storage file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ClientError::Storage {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(entries).map_err(|source| ClientError::Decode {
            what: "storage entries".to_string(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(|source| ClientError::Storage {
            path: self.path.clone(),
            source,
        })
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.lock();
        self.load().remove(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) -> Result<(), ClientError> {
        let _guard = self.lock.lock();
        let mut entries = self.load();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.save(&entries)
    }

    fn remove(&self) -> Result<(), ClientError> {
        let _guard = self.lock.lock();
        let mut entries = self.load();
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn set(&self, token: &str) -> Result<(), ClientError> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), ClientError> {
        *self.token.lock() = None;
        Ok(())
    }
}
