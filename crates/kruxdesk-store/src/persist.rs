//! Key-value storage adapter for JSON snapshots.
//!
//! State is mirrored to storage as whole JSON documents keyed by fixed
//! names. There is no schema versioning and no migration path; loading an
//! incompatible shape surfaces an error that callers log and ignore.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use kruxdesk_core::error::{DeskError, Result};

/// Fixed document keys used by the kruxdesk persistence layer.
pub mod keys {
    /// The full conversation list.
    pub const CONVERSATIONS: &str = "krux_conversations";
    /// The signed-in principal snapshot.
    pub const AUTH_USER: &str = "krux_auth_user";
    /// The loan application book.
    pub const LOAN_APPLICATIONS: &str = "krux_loan_applications";
}

/// A key-value document store holding JSON strings.
///
/// Implementations are expected to be used by a single logical writer.
/// Two store instances sharing the same backing storage are not
/// synchronized; the last write wins.
pub trait KeyValueStorage: Send + Sync {
    /// Read the document stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous document.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the document under `key`. Removing a missing key is not an
    /// error.
    fn remove(&self, key: &str) -> Result<()>;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage backend, primarily for tests.
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let docs = self
            .documents
            .lock()
            .map_err(|e| DeskError::Storage(format!("Lock poisoned: {}", e)))?;
        Ok(docs.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut docs = self
            .documents
            .lock()
            .map_err(|e| DeskError::Storage(format!("Lock poisoned: {}", e)))?;
        docs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut docs = self
            .documents
            .lock()
            .map_err(|e| DeskError::Storage(format!("Lock poisoned: {}", e)))?;
        docs.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// File-backed storage keeping one JSON document per key under a root
/// directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a file storage rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DeskError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| {
            DeskError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DeskError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ---- MemoryStorage ----

    #[test]
    fn test_memory_get_missing() {
        let storage = MemoryStorage::new();
        assert!(storage.get("absent").unwrap().is_none());
    }

    #[test]
    fn test_memory_put_get() {
        let storage = MemoryStorage::new();
        storage.put(keys::CONVERSATIONS, "[]").unwrap();
        assert_eq!(storage.get(keys::CONVERSATIONS).unwrap().unwrap(), "[]");
    }

    #[test]
    fn test_memory_put_overwrites() {
        let storage = MemoryStorage::new();
        storage.put("k", "first").unwrap();
        storage.put("k", "second").unwrap();
        assert_eq!(storage.get("k").unwrap().unwrap(), "second");
    }

    #[test]
    fn test_memory_remove() {
        let storage = MemoryStorage::new();
        storage.put("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.get("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_remove_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("absent").is_ok());
    }

    // ---- FileStorage ----

    #[test]
    fn test_file_put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.put(keys::AUTH_USER, "{\"role\":\"customer\"}").unwrap();
        assert_eq!(
            storage.get(keys::AUTH_USER).unwrap().unwrap(),
            "{\"role\":\"customer\"}"
        );
    }

    #[test]
    fn test_file_get_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get("absent").unwrap().is_none());
    }

    #[test]
    fn test_file_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.remove("absent").is_ok());
    }

    #[test]
    fn test_file_remove_deletes_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.put("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.get("k").unwrap().is_none());
    }

    #[test]
    fn test_file_open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let storage = FileStorage::open(&nested).unwrap();
        storage.put("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn test_file_documents_named_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.put(keys::CONVERSATIONS, "[]").unwrap();
        assert!(dir.path().join("krux_conversations.json").exists());
    }
}
