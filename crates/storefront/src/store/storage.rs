//! Storage adapters for persisted store snapshots.
//!
//! The stores serialize their full state after every accepted mutation and
//! hand the document to an adapter keyed by a fixed namespaced name. Swapping
//! the adapter swaps the durability story: `MemoryStorage` for tests,
//! `FileStorage` for production.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Namespaced key for the cart snapshot.
pub const CART_KEY: &str = "aurelle-cart";

/// Namespaced key for the wishlist snapshot.
pub const WISHLIST_KEY: &str = "aurelle-wishlist";

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying storage I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State could not be serialized.
    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key/value storage for serialized store snapshots.
///
/// Writes are synchronous and last-write-wins; concurrent writers sharing a
/// key are not reconciled.
pub trait StorageAdapter {
    /// Load the document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying storage fails. A missing key
    /// is `Ok(None)`, not an error.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Persist `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying storage fails.
    fn persist(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the document stored under `key`; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying storage fails.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// Stores can borrow a shared adapter (e.g. cart and wishlist over one
// FileStorage instance).
impl<S: StorageAdapter + ?Sized> StorageAdapter for &S {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).persist(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory adapter for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// File-backed adapter: one JSON document per key under a directory.
///
/// Writes go to a temp file first and are renamed into place, so an
/// interrupted write never leaves a torn snapshot behind.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageAdapter for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
