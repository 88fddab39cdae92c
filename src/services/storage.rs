//! Persistent key/value storage for configuration records.
//!
//! Records are whole JSON documents addressed by a short key. A save
//! overwrites the previous record wholesale.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::debug;

/// Storage backend for configuration records.
pub trait ConfigStore {
    /// Reads the record stored under `key`, `None` when absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the record stored under `key`.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes the record under `key`. Removing a missing record succeeds.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores each record as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path of the record under `key`.
    ///
    /// Keys are plain names: ASCII alphanumerics, `-` and `_`.
    pub fn record_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            anyhow::bail!("Invalid storage key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl ConfigStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read record: {}", path.display()))?;
        Ok(Some(content))
    }

    /// Uses temp file + rename so a crash never leaves a truncated record.
    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key)?;
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create storage directory: {}", self.dir.display())
        })?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write temp record: {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to rename temp record to: {}", path.display()))?;

        debug!(path = %path.display(), bytes = value.len(), "Record written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove record: {}", path.display()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryRecords {
    values: std::collections::BTreeMap<String, String>,
    history: Vec<(String, String)>,
}

/// In-memory store. Clones share the same records, so a test can keep a
/// handle after moving the store into a service.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Rc<RefCell<MemoryRecords>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one record.
    #[must_use]
    pub fn with_record(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .records
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Current value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.records.borrow().values.get(key).cloned()
    }

    /// Every save in order, as `(key, value)` pairs.
    #[must_use]
    pub fn history(&self) -> Vec<(String, String)> {
        self.records.borrow().history.clone()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let mut records = self.records.borrow_mut();
        records.values.insert(key.to_string(), value.to_string());
        records.history.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.records.borrow_mut().values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("data"));

        assert_eq!(store.load("config").unwrap(), None);

        store.save("config", "{\"a\":1}").unwrap();
        assert_eq!(store.load("config").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(!temp_dir.path().join("data/config.json.tmp").exists());

        store.save("config", "{}").unwrap();
        assert_eq!(store.load("config").unwrap().as_deref(), Some("{}"));

        store.remove("config").unwrap();
        store.remove("config").unwrap();
        assert_eq!(store.load("config").unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let store = FileStore::new("/tmp");
        assert!(store.record_path("../escape").is_err());
        assert!(store.record_path("").is_err());
        assert!(store.record_path("custom_v2").is_ok());
    }

    #[test]
    fn test_memory_store_shares_records() {
        let store = MemoryStore::new();
        let mut handle = store.clone();

        handle.save("config", "one").unwrap();
        handle.save("config", "two").unwrap();

        assert_eq!(store.get("config").as_deref(), Some("two"));
        assert_eq!(store.history().len(), 2);

        handle.remove("config").unwrap();
        assert_eq!(store.load("config").unwrap(), None);
    }
}
