//! Durable key/value storage.
//!
//! Each key holds one JSON document. `FileStorage` keeps documents on disk and
//! survives restarts; `MemoryStorage` lives for the process only.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::{ArsipConfig, StorageBackend};
use crate::error::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Raw key/value storage backend.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Storage: Send + Sync {
    /// Read the document stored under `key`, if any
    fn read(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous document
    fn write(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Open the backend selected by the configuration.
pub fn open(config: &ArsipConfig) -> AppResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::File => Ok(Arc::new(FileStorage::open(&config.storage_dir)?)),
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
    }
}

// =============================================================================
// File Backend
// =============================================================================

/// Directory-backed storage, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory.
    pub fn open(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            AppError::persistence(format!("cannot create {}: {}", root.display(), e))
        })?;
        debug!("File storage opened at {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::persistence(format!("read {}: {}", key, e))),
        }
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        // Write-then-rename so a crash never leaves a half-written document
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| AppError::persistence(format!("write {}: {}", key, e)))?;

        debug!(key, bytes = value.len(), "Storage key written");
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::persistence(format!("remove {}: {}", key, e))),
        }
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, sorted
    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// Typed JSON Access
// =============================================================================

/// Typed JSON view over a storage backend.
#[derive(Clone)]
pub struct JsonStore {
    backend: Arc<dyn Storage>,
}

impl JsonStore {
    pub fn new(backend: Arc<dyn Storage>) -> Self {
        Self { backend }
    }

    /// Load and decode the document under `key`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.backend.read(key)? {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::persistence(format!("decode {}: {}", key, e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Encode `value` and store it under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.backend.write(key, &json)
    }

    /// Remove the document under `key`.
    pub fn clear(&self, key: &str) -> AppResult<()> {
        self.backend.remove(key)
    }
}

impl std::fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore").finish_non_exhaustive()
    }
}
