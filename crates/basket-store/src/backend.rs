//! # Storage Backends
//!
//! The key-value abstraction the cart blob is stored under, plus the two
//! shipped implementations.
//!
//! ## Why a Trait?
//! The cart module treats durable storage as an opaque string key-value
//! store, exactly like browser local storage. Hiding it behind a trait
//! keeps `CartStore` testable (memory backend) and lets embedders bring
//! their own storage without touching the blob codec.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Backend Trait
// =============================================================================

/// A durable string key-value store.
///
/// Semantics mirror browser local storage: `put` fully overwrites the
/// prior value for the key, so the last write wins.
pub trait StorageBackend: Send + Sync {
    /// Reads the value for `key`, or `None` if the key has never been
    /// written (or was removed).
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// Memory Backend
// =============================================================================

/// In-memory backend for tests and ephemeral (incognito-style) sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().expect("memory backend mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("memory backend mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("memory backend mutex poisoned");
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Backend
// =============================================================================

/// File-backed store: one file per key under a base directory.
///
/// ## Atomicity
/// Writes go to a temp file in the same directory and are moved into
/// place with `rename`, so a crash mid-write leaves the previous blob
/// intact rather than a truncated one.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a file backend rooted at `dir`. The directory is created
    /// lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    /// Maps a storage key to its file path.
    ///
    /// Keys are sanitized to a filesystem-safe alphabet so an embedder
    /// key like `basket.cart` cannot escape the base directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    fn write_failed(&self, key: &str, err: impl ToString) -> StoreError {
        StoreError::WriteFailed {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| self.write_failed(key, e))?;

        let path = self.path_for(key);
        let tmp = tmp_path(&path);

        fs::write(&tmp, value).map_err(|e| self.write_failed(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| self.write_failed(key, e))?;

        debug!(key = %key, path = %path.display(), "cart blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.write_failed(key, e)),
        }
    }
}

/// Sibling temp path for the atomic write.
fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();

        assert_eq!(backend.get("k").unwrap(), None);
        backend.put("k", "v1").unwrap();
        assert_eq!(backend.get("k").unwrap(), Some("v1".to_string()));

        // Overwrite: last write wins
        backend.put("k", "v2").unwrap();
        assert_eq!(backend.get("k").unwrap(), Some("v2".to_string()));

        backend.remove("k").unwrap();
        assert_eq!(backend.get("k").unwrap(), None);

        // Removing an absent key is a no-op
        backend.remove("k").unwrap();
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        assert_eq!(backend.get("basket.cart").unwrap(), None);
        backend.put("basket.cart", "{\"v\":1}").unwrap();
        assert_eq!(
            backend.get("basket.cart").unwrap(),
            Some("{\"v\":1}".to_string())
        );

        backend.remove("basket.cart").unwrap();
        assert_eq!(backend.get("basket.cart").unwrap(), None);
        backend.remove("basket.cart").unwrap();
    }

    #[test]
    fn test_file_backend_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        backend.put("../escape/attempt", "data").unwrap();
        assert_eq!(
            backend.get("../escape/attempt").unwrap(),
            Some("data".to_string())
        );

        // Nothing was written outside the base directory
        assert!(!dir.path().parent().unwrap().join("escape").exists());
    }

    #[test]
    fn test_file_backend_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        backend.put("k", "value").unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }
}
