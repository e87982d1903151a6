//! Key-value store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Persisted key-value store holding string values
///
/// Values never expire; callers own their encoding. Use the helper methods
/// on [`KeyValueStoreExt`] for JSON-encoded values.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Gets a raw string value
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw string value, replacing any previous one
    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Deletes a value, returns true if it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Checks if a key is present
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get_raw(key).await?.is_some())
    }

    /// Name of the backend, used in logs
    fn backend_name(&self) -> &'static str;
}

/// Extension trait providing JSON-typed get/set operations
pub trait KeyValueStoreExt: KeyValueStore {
    /// Gets a JSON-decoded value
    fn get_json<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::serialization(format!(
                            "Failed to decode value for '{}': {}",
                            key, e
                        ))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Sets a JSON-encoded value
    fn set_json<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync + ?Sized,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::serialization(format!("Failed to encode value for '{}': {}", key, e))
            })?;
            self.set_raw(key, &data).await
        }
    }
}

// Blanket implementation for all types implementing KeyValueStore
impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock key-value store for testing
    #[derive(Debug, Default)]
    pub struct MockKeyValueStore {
        entries: Mutex<HashMap<String, String>>,
        read_error: Mutex<Option<String>>,
        write_error: Mutex<Option<String>>,
        writes: AtomicUsize,
    }

    impl MockKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_json_entry<V: Serialize>(self, key: &str, value: &V) -> Self {
            let json = serde_json::to_string(value).unwrap();
            self.with_entry(key, &json)
        }

        /// Makes every read fail
        pub fn with_read_error(self, error: impl Into<String>) -> Self {
            *self.read_error.lock().unwrap() = Some(error.into());
            self
        }

        /// Makes every write fail
        pub fn with_write_error(self, error: impl Into<String>) -> Self {
            *self.write_error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn value(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn check_read(&self) -> Result<(), DomainError> {
            if let Some(error) = self.read_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }

        fn check_write(&self) -> Result<(), DomainError> {
            if let Some(error) = self.write_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl KeyValueStore for MockKeyValueStore {
        async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
            self.check_read()?;
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
            self.check_write()?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<bool, DomainError> {
            self.check_write()?;
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }

        fn backend_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_store_set_get() {
            let store = MockKeyValueStore::new();
            store.set_raw("key1", "value1").await.unwrap();

            let result = store.get_raw("key1").await.unwrap();
            assert_eq!(result, Some("value1".to_string()));
            assert_eq!(store.write_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_store_json_round_trip() {
            let store = MockKeyValueStore::new();
            store.set_json("names", &vec!["a", "b"]).await.unwrap();

            let names: Option<Vec<String>> = store.get_json("names").await.unwrap();
            assert_eq!(names, Some(vec!["a".to_string(), "b".to_string()]));
        }

        #[tokio::test]
        async fn test_mock_store_invalid_json() {
            let store = MockKeyValueStore::new().with_entry("broken", "{not json");

            let result: Result<Option<Vec<String>>, _> = store.get_json("broken").await;
            assert!(matches!(result, Err(DomainError::Serialization { .. })));
        }

        #[tokio::test]
        async fn test_mock_store_delete() {
            let store = MockKeyValueStore::new().with_entry("key1", "value1");

            assert!(store.delete("key1").await.unwrap());
            assert!(!store.exists("key1").await.unwrap());
        }

        #[tokio::test]
        async fn test_mock_store_errors() {
            let store = MockKeyValueStore::new()
                .with_read_error("read failed")
                .with_write_error("write failed");

            assert!(store.get_raw("key").await.is_err());
            assert!(store.set_raw("key", "value").await.is_err());
            assert_eq!(store.write_count(), 0);
        }
    }
}
