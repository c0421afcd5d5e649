//! Key-value store backends
//!
//! - `MemoryStore`: shared in-process map (cloning shares the same data)
//! - `FileStore`: whole map kept in one JSON object file

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{StateError, StateResult};

/// Durable string-keyed storage
pub trait KeyValueStore {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> StateResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> StateResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory store
///
/// Clones share the backing map, so a test can keep one handle while the
/// session owns another and "restart" against the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StateResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StateResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// JSON file store
///
/// The file is read once on open; every `set` rewrites it. A file that
/// exists but cannot be read is never written.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    writable: bool,
}

impl FileStore {
    /// Open the store at the default location
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Open a store file. A missing or malformed file starts empty.
    ///
    /// Any other read failure also starts empty but leaves the store
    /// read-only, so the existing file is kept.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let (entries, writable) = match fs::read_to_string(&path) {
            Ok(content) => {
                let entries = serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("Ignoring malformed store file {:?}: {}", path, e);
                    BTreeMap::new()
                });
                (entries, true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => (BTreeMap::new(), true),
            Err(e) => {
                log::warn!(
                    "Cannot read store file {:?}, changes will not be saved: {}",
                    path,
                    e
                );
                (BTreeMap::new(), false)
            }
        };
        Self {
            path,
            entries,
            writable,
        }
    }

    /// False when the file could not be read and will not be written
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default store file path
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gogo-slot")
            .join("storage.json")
    }

    fn flush(&self) -> StateResult<()> {
        if !self.writable {
            return Err(StateError::ReadOnly(self.path.clone()));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StateResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StateResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shared_between_clones() {
        let store = MemoryStore::new();
        let mut handle = store.clone();

        handle.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path);
        store.set("slot_coins", "42").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("slot_coins").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_file_store_unreadable_path_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::create_dir(&path).unwrap();

        let mut store = FileStore::open(&path);
        assert!(!store.is_writable());
        assert!(matches!(
            store.set("slot_coins", "42"),
            Err(StateError::ReadOnly(_))
        ));
        assert!(path.is_dir());
    }

    #[test]
    fn test_file_store_missing_file_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("storage.json"));
        assert!(store.is_writable());
    }

    #[test]
    fn test_file_store_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("slot_coins").unwrap(), None);
    }
}
