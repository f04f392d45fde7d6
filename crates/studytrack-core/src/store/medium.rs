//! Storage media backing the persistent store.
//!
//! A medium is a dumb string key/value surface. Serialization, fallback
//! handling, and change notification all live a layer up in
//! [`PersistentStore`](super::PersistentStore).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, StoreError};

/// Durable per-origin key/value medium.
pub trait StorageMedium: Send + Sync {
    /// Read the raw entry for `key`, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write the raw entry for `key`, replacing any previous value.
    fn write(&self, key: &str, raw: &str) -> Result<()>;

    /// Remove the entry for `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile in-memory medium.
///
/// Used by tests and as a stand-in when no durable location is available;
/// entries live only as long as the process.
#[derive(Default)]
pub struct MemoryMedium {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageMedium for MemoryMedium {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn write(&self, key: &str, raw: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// File-backed medium: one JSON document per key under a directory.
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Open a medium rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StorageMedium for FileMedium {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, raw: &str) -> Result<()> {
        let path = self.entry_path(key);
        std::fs::write(&path, raw).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// Lock a mutex, recovering the inner state if a panic poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_medium_roundtrip() {
        let medium = MemoryMedium::new();
        assert!(medium.read("k").unwrap().is_none());
        medium.write("k", "v1").unwrap();
        assert_eq!(medium.read("k").unwrap().as_deref(), Some("v1"));
        medium.write("k", "v2").unwrap();
        assert_eq!(medium.read("k").unwrap().as_deref(), Some("v2"));
        medium.remove("k").unwrap();
        assert!(medium.read("k").unwrap().is_none());
    }

    #[test]
    fn file_medium_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let medium = FileMedium::open(tmp.path()).unwrap();
        assert!(medium.read("data").unwrap().is_none());
        medium.write("data", "{\"a\":1}").unwrap();
        assert_eq!(medium.read("data").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(tmp.path().join("data.json").exists());
        medium.remove("data").unwrap();
        assert!(medium.read("data").unwrap().is_none());
        // Removing twice is fine.
        medium.remove("data").unwrap();
    }
}
