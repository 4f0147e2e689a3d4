//! Durable key-value storage for session state.
//!
//! This module provides the storage seam used by the credential store:
//! - `Storage`: synchronous, fallible string storage keyed by [`StorageKey`]
//! - `MemoryStorage`: volatile backend for tests and ephemeral sessions
//! - `FileStorage`: durable backend persisted as one JSON document

mod file;
mod memory;
mod storage_key;

use std::sync::Arc;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use storage_key::StorageKey;

use crate::Result;

/// Synchronous key-value storage.
///
/// Writes are last-write-wins; `remove` on a missing key succeeds.
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: StorageKey) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: StorageKey, value: &str) -> Result<()>;

    /// Removes `key`.
    fn remove(&self, key: StorageKey) -> Result<()>;

    /// Returns `true` if a value is stored under `key`.
    fn contains(&self, key: StorageKey) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: StorageKey) -> Result<bool> {
        (**self).contains(key)
    }
}
