//! JSON file backed key-value store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::key_value::KeyValueStore;
use crate::domain::DomainError;

/// Key-value store persisted as a single JSON object on disk
///
/// The file is read once on first access and rewritten on every mutation.
/// Writes go to a sibling temporary file that is then renamed over the
/// backing file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileKeyValueStore {
    /// Creates a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<BTreeMap<String, String>, DomainError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                DomainError::storage(format!(
                    "Failed to parse store file '{}': {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file missing, starting empty");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(DomainError::storage(format!(
                "Failed to read store file '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let data = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::serialization(format!("Failed to encode store: {}", e)))?;

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, data).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to write store file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;

        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to replace store file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut guard = self.entries.lock().await;

        if guard.is_none() {
            *guard = Some(self.read_file().await?);
        }

        Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut guard = self.entries.lock().await;

        let mut entries = match guard.as_ref() {
            Some(entries) => entries.clone(),
            None => self.read_file().await?,
        };

        entries.insert(key.to_string(), value.to_string());
        self.write_file(&entries).await?;
        *guard = Some(entries);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut guard = self.entries.lock().await;

        let mut entries = match guard.as_ref() {
            Some(entries) => entries.clone(),
            None => self.read_file().await?,
        };

        // The cached map only changes once the file has been replaced
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_file(&entries).await?;
        }
        *guard = Some(entries);

        Ok(existed)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("store.json"));

        assert!(store.get_raw("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileKeyValueStore::new(&path);
        store.set_raw("skill_embeddings:offline_mode", "true").await.unwrap();
        store.set_raw("skill_embeddings:last_sync", "1700000000000").await.unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(
            reopened.get_raw("skill_embeddings:offline_mode").await.unwrap(),
            Some("true".to_string())
        );
        assert_eq!(
            reopened.get_raw("skill_embeddings:last_sync").await.unwrap(),
            Some("1700000000000".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileKeyValueStore::new(&path);
        store.set_raw("key1", "value1").await.unwrap();
        assert!(store.delete("key1").await.unwrap());
        assert!(!store.delete("key1").await.unwrap());

        let reopened = FileKeyValueStore::new(&path);
        assert!(reopened.get_raw("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::new(&path);
        let result = store.get_raw("key").await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cached_entries_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileKeyValueStore::new(&path);
        store.set_raw("skill_embeddings:offline_mode", "true").await.unwrap();

        // A directory in place of the temp file makes every write fail
        std::fs::create_dir(dir.path().join("store.tmp")).unwrap();

        assert!(store.set_raw("skill_embeddings:last_sync", "123").await.is_err());
        assert!(store.get_raw("skill_embeddings:last_sync").await.unwrap().is_none());

        assert!(store.delete("skill_embeddings:offline_mode").await.is_err());
        assert_eq!(
            store.get_raw("skill_embeddings:offline_mode").await.unwrap(),
            Some("true".to_string())
        );

        let reopened = FileKeyValueStore::new(&path);
        assert!(reopened.get_raw("skill_embeddings:last_sync").await.unwrap().is_none());
    }
}
