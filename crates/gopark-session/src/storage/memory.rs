//! In-process storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{Storage, StorageKey};
use crate::{Error, Result, TRACING_TARGET_STORAGE};

/// Volatile storage kept in memory for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::unavailable("memory storage lock poisoned"))?;
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::unavailable("memory storage lock poisoned"))?;
        entries.insert(key, value.to_owned());

        tracing::trace!(
            target: TRACING_TARGET_STORAGE,
            key = %key,
            size_bytes = value.len(),
            "stored value in memory"
        );
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::unavailable("memory storage lock poisoned"))?;
        entries.remove(&key);
        Ok(())
    }
}
