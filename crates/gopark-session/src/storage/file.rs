//! Durable storage backed by a single JSON document.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Storage, StorageKey};
use crate::{Error, Result, TRACING_TARGET_STORAGE};

/// On-disk layout of the storage file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StorageDocument {
    #[serde(default)]
    entries: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<Timestamp>,
}

/// Durable key-value storage persisted to one JSON file.
///
/// Every read and mutation loads the current file, so handles sharing a path
/// see each other's writes and conflicts resolve per key. The whole document
/// is rewritten on every mutation through a temporary sibling file and a
/// rename, so a crash never leaves a half-written document. Entries with
/// unknown keys are preserved untouched.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Opens the storage file, starting empty when it does not exist yet.
    ///
    /// An existing file must hold a valid document.
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        skip(path),
        fields(path = %path.as_ref().display())
    )]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let storage = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };

        let document = storage.load()?;
        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            entries = document.entries.len(),
            "opened storage file"
        );
        Ok(storage)
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current document; a missing file is an empty document.
    fn load(&self) -> Result<StorageDocument> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(StorageDocument::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Applies a mutation to the current document and persists it.
    fn mutate(
        &self,
        key: StorageKey,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::unavailable("file storage lock poisoned"))?;

        let mut document = self.load()?;
        apply(&mut document.entries);
        document.updated_at = Some(Timestamp::now());
        self.persist(&document)?;

        tracing::trace!(
            target: TRACING_TARGET_STORAGE,
            key = %key,
            path = %self.path.display(),
            "persisted storage file"
        );
        Ok(())
    }

    fn persist(&self, document: &StorageDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut temp_name = self.path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);

        let json = serde_json::to_vec_pretty(document)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path).inspect_err(|error| {
            tracing::warn!(
                target: TRACING_TARGET_STORAGE,
                error = %error,
                path = %self.path.display(),
                "failed to replace storage file"
            );
        })?;

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let mut document = self.load()?;
        Ok(document.entries.remove(key.as_ref()))
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.mutate(key, |entries| {
            entries.insert(key.as_ref().to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.mutate(key, |entries| {
            entries.remove(key.as_ref());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("session.json")).unwrap();

        assert_eq!(storage.get(StorageKey::Token).unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(StorageKey::Token, "tok-1").unwrap();
        storage.set(StorageKey::Role, "owner").unwrap();
        storage.remove(StorageKey::Role).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(StorageKey::Token).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(reopened.get(StorageKey::Role).unwrap(), None);
    }

    #[test]
    fn test_last_writer_wins_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let first = FileStorage::open(&path).unwrap();
        let second = FileStorage::open(&path).unwrap();
        first.set(StorageKey::Role, "owner").unwrap();
        second.set(StorageKey::Role, "admin").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(StorageKey::Role).unwrap().as_deref(), Some("admin"));
    }

    #[test]
    fn test_handles_keep_each_others_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let first = FileStorage::open(&path).unwrap();
        let second = FileStorage::open(&path).unwrap();
        second.set(StorageKey::RememberedLogin, "remembered").unwrap();
        first.set(StorageKey::Token, "tok").unwrap();

        assert_eq!(first.get(StorageKey::RememberedLogin).unwrap().as_deref(), Some("remembered"));
        assert_eq!(second.get(StorageKey::Token).unwrap().as_deref(), Some("tok"));

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get(StorageKey::RememberedLogin).unwrap().as_deref(),
            Some("remembered")
        );
        assert_eq!(reopened.get(StorageKey::Token).unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn test_unknown_entries_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"entries":{"other.app":"kept"}}"#).unwrap();

        let storage = FileStorage::open(&path).unwrap();
        storage.set(StorageKey::Token, "tok").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("other.app"));
        assert!(raw.contains("gopark.token"));
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(Error::Serialization(_))
        ));
    }
}
