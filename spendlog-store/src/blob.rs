//! String-keyed JSON blob storage.
//!
//! Every data store persists one JSON value under one key. Two backends are
//! provided:
//!
//! - [`FileBlobStore`] - one `<key>.json` file per key in a directory
//! - [`MemoryBlobStore`] - an in-process map, used by tests and previews
//!
//! There is no atomicity across keys.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::persistence::{ensure_dir, load_json, save_json};

/// Keys used by the data stores.
pub mod keys {
    /// Expense list.
    pub const EXPENSES: &str = "expenses";
    /// Savings goal list.
    pub const SAVINGS_GOALS: &str = "savingsGoals";
    /// Serialized session user.
    pub const USER: &str = "user";
    /// Session token string.
    pub const TOKEN: &str = "token";
}

// ============================================================================
// Blob Store Trait
// ============================================================================

/// Flat key-value storage of JSON values.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Reads the value under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns true if a value is stored under `key`.
    async fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Rejects keys that could escape the storage directory.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ============================================================================
// File Backend
// ============================================================================

/// Blob store keeping one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Creates a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store rooted at `dir`, creating the directory now.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(dir);
        ensure_dir(&store.dir).await?;
        Ok(store)
    }

    /// Directory holding the blob files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!(key, "Blob not found");
            return Ok(None);
        }
        load_json(&path).await.map(Some)
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        save_json(&path, &value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Blob removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Memory Backend
// ============================================================================

/// In-process blob store.
///
/// Can be switched offline to exercise storage-unavailable paths.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Value>>,
    available: AtomicBool,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Makes every subsequent call succeed (`true`) or fail (`false`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory blob store is offline".to_string()))
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.check_available()?;
        validate_key(key)?;
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.check_available()?;
        validate_key(key)?;
        self.blobs.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        validate_key(key)?;
        self.blobs.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
