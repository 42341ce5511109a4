//! Persistent key-value storage for the auth token and cached user record.
//!
//! [`KeyValueStore`] is the seam: [`FileStore`] keeps one file per key in the
//! data directory and survives restarts, [`MemoryStore`] lives only as long
//! as the process and backs tests. Failures propagate to the caller; there is
//! no recovery here.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::models::User;

/// Fixed storage keys.
pub mod keys {
    /// Bearer token returned by login/register.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Last-known user record, serialized as JSON.
    pub const USER_DATA: &str = "user_data";
}

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stored value could not be (de)serialized.
    #[error("corrupt value for {key}: {source}")]
    Serde {
        /// Key whose value is corrupt.
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A persistent string key-value namespace.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed store: each key is a file inside `base_dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_dir`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir).map_err(|source| StorageError::Io {
            path: self.base_dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

// =============================================================================
// Typed helpers
// =============================================================================

/// Read the stored bearer token.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn load_token(store: &dyn KeyValueStore) -> Result<Option<SecretString>, StorageError> {
    Ok(store
        .get(keys::AUTH_TOKEN)?
        .filter(|token| !token.is_empty())
        .map(SecretString::from))
}

/// Persist the bearer token.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn save_token(store: &dyn KeyValueStore, token: &SecretString) -> Result<(), StorageError> {
    store.set(keys::AUTH_TOKEN, token.expose_secret())
}

/// Read the cached user record.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the record is corrupt.
pub fn load_user(store: &dyn KeyValueStore) -> Result<Option<User>, StorageError> {
    store
        .get(keys::USER_DATA)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StorageError::Serde {
                key: keys::USER_DATA.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Cache the user record.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized or written.
pub fn save_user(store: &dyn KeyValueStore, user: &User) -> Result<(), StorageError> {
    let raw = serde_json::to_string(user).map_err(|source| StorageError::Serde {
        key: keys::USER_DATA.to_owned(),
        source,
    })?;
    store.set(keys::USER_DATA, &raw)
}

/// Remove the token and the cached user record.
///
/// # Errors
///
/// Returns an error if either key cannot be removed. The token is removed
/// first so a failure on the user record never leaves a live token behind.
pub fn clear_auth(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(keys::AUTH_TOKEN)?;
    store.remove(keys::USER_DATA)
}
