//! Persisted key-value storage
//!
//! The session store keeps its records in a small string key-value store,
//! the way a browser client keeps them in local storage. Backends are
//! synchronous and may fail; callers decide how to treat failures.

pub mod files;
pub mod memory;

pub use files::FileStore;
pub use memory::MemoryStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::utils::error::{PortalError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// String key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Result of reading a persisted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    /// The record exists and parsed
    Found(T),
    /// No record under the key
    Empty,
    /// The record exists but does not parse
    Corrupt(String),
    /// The backend failed to read
    Unreadable(String),
}

impl<T> LoadOutcome<T> {
    /// Collapse to an option; everything but `Found` is absence
    pub fn into_option(self) -> Option<T> {
        match self {
            LoadOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadOutcome::Corrupt(_))
    }
}

/// Read and parse a JSON record
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> LoadOutcome<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => LoadOutcome::Found(value),
            Err(e) => LoadOutcome::Corrupt(e.to_string()),
        },
        Ok(None) => LoadOutcome::Empty,
        Err(e) => LoadOutcome::Unreadable(e.to_string()),
    }
}

/// Read a plain string record
pub fn load_string(store: &dyn KeyValueStore, key: &str) -> LoadOutcome<String> {
    match store.get(key) {
        Ok(Some(raw)) => LoadOutcome::Found(raw),
        Ok(None) => LoadOutcome::Empty,
        Err(e) => LoadOutcome::Unreadable(e.to_string()),
    }
}

/// Serialize and write a JSON record
pub fn store_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Build the backend selected by configuration
pub fn open(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            debug!("Using in-memory session storage");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::File => {
            let directory = config.directory.as_ref().ok_or_else(|| {
                PortalError::config("storage.directory is required for the file backend")
            })?;
            info!("Using file session storage at {:?}", directory);
            Ok(Arc::new(FileStore::open(directory)?))
        }
    }
}
