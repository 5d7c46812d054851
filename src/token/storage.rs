//! Key-Value Storage
//!
//! Persistent string storage backing the token pair across restarts.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Persistent key-value store interface.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory key-value store. Nothing survives the process.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Key-value store persisted as a JSON object in a single file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash never leaves a half-written file behind.
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileKeyValueStore {
    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StorageError::CorruptedData {
                    message: format!("{}: {}", self.path.display(), e),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StorageError::ReadFailed {
                message: format!("{}: {}", self.path.display(), e),
            }),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let contents =
            serde_json::to_string_pretty(entries).map_err(|e| StorageError::WriteFailed {
                message: e.to_string(),
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::WriteFailed {
                    message: format!("{}: {}", parent.display(), e),
                })?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| StorageError::WriteFailed {
                message: format!("{}: {}", tmp.display(), e),
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::WriteFailed {
                message: format!("{}: {}", self.path.display(), e),
            })
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await.map_err(|e| StorageError::DeleteFailed {
            message: e.to_string(),
        })?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&entries)
            .await
            .map_err(|e| StorageError::DeleteFailed {
                message: e.to_string(),
            })
    }
}

/// Storage operation recorded by [`MockKeyValueStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageOp {
    Get(String),
    Set(String, String),
    Remove(String),
}

/// Mock key-value store for testing.
#[derive(Default)]
pub struct MockKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    history: Mutex<Vec<StorageOp>>,
    should_fail: Mutex<bool>,
}

impl MockKeyValueStore {
    /// Create new mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a value.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Make every operation fail.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock() = should_fail;
        self
    }

    /// Current value of a key, bypassing failure injection and history.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Operations performed so far.
    pub fn get_history(&self) -> Vec<StorageOp> {
        self.history.lock().clone()
    }

    fn check_error(&self) -> Result<(), StorageError> {
        if *self.should_fail.lock() {
            return Err(StorageError::WriteFailed {
                message: "Mock storage failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.history.lock().push(StorageOp::Get(key.to_string()));
        if *self.should_fail.lock() {
            return Err(StorageError::ReadFailed {
                message: "Mock storage failure".to_string(),
            });
        }
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.history
            .lock()
            .push(StorageOp::Set(key.to_string(), value.to_string()));
        self.check_error()?;
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.history.lock().push(StorageOp::Remove(key.to_string()));
        self.check_error()?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("access_token").await.unwrap(), None);

        store.set("access_token", "A1").await.unwrap();
        assert_eq!(store.get("access_token").await.unwrap().as_deref(), Some("A1"));

        store.remove("access_token").await.unwrap();
        store.remove("access_token").await.unwrap();
        assert_eq!(store.get("access_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("tokens.json");

        let store = FileKeyValueStore::new(&path);
        store.set("access_token", "A1").await.unwrap();
        store.set("refresh_token", "R1").await.unwrap();
        store.remove("access_token").await.unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get("access_token").await.unwrap(), None);
        assert_eq!(
            reopened.get("refresh_token").await.unwrap().as_deref(),
            Some("R1")
        );
    }

    #[tokio::test]
    async fn test_file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::new(&path);
        assert!(matches!(
            store.get("access_token").await,
            Err(StorageError::CorruptedData { .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_store_records_history_and_fails_on_demand() {
        let store = MockKeyValueStore::new().with_entry("refresh_token", "R1");
        assert_eq!(store.get("refresh_token").await.unwrap().as_deref(), Some("R1"));

        store.set_should_fail(true);
        assert!(store.set("access_token", "A1").await.is_err());
        assert_eq!(store.peek("access_token"), None);

        assert_eq!(
            store.get_history(),
            vec![
                StorageOp::Get("refresh_token".to_string()),
                StorageOp::Set("access_token".to_string(), "A1".to_string()),
            ]
        );
    }
}
