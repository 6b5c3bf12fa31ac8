use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::CacheStore;

const CACHE_PREFIX: &str = "cache";

struct Entry {
    data: CacheData,
    expires_at: Instant,
}

/// In-memory cache store. Expiry is enforced on read, so an expired entry
/// behaves exactly like an absent one.
pub struct InMemoryCacheStore {
    entry: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory cache store");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put_with_ttl(
        &self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: u64,
    ) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        let entry = Entry {
            data: value,
            expires_at: Instant::now() + Duration::from_secs(ttl),
        };
        self.entry.lock().await.insert(key, entry);
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        let mut entries = self.entry.lock().await;
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.data.clone())),
            Some(_) => {
                entries.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entry.lock().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        assert_eq!(
            InMemoryCacheStore::make_key("csrf", "session123"),
            "cache:csrf:session123"
        );
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryCacheStore::new();
        let value = CacheData {
            value: "test value".to_string(),
        };

        store.put_with_ttl("test", "key1", value, 60).await.unwrap();

        let retrieved = store.get("test", "key1").await.unwrap();
        assert_eq!(retrieved.unwrap().value, "test value");
    }

    #[tokio::test]
    async fn test_expired_entry_treated_as_absent() {
        let store = InMemoryCacheStore::new();
        let value = CacheData {
            value: "short lived".to_string(),
        };

        store.put_with_ttl("test", "key1", value, 0).await.unwrap();

        assert!(store.get("test", "key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryCacheStore::new();
        let value = CacheData {
            value: "to remove".to_string(),
        };

        store.put_with_ttl("test", "key1", value, 60).await.unwrap();
        store.remove("test", "key1").await.unwrap();

        assert!(store.get("test", "key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let store = InMemoryCacheStore::new();
        assert!(store.get("test", "nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prefix_isolation() {
        let store = InMemoryCacheStore::new();
        let v1 = CacheData {
            value: "one".to_string(),
        };
        let v2 = CacheData {
            value: "two".to_string(),
        };

        store.put_with_ttl("p1", "shared", v1, 60).await.unwrap();
        store.put_with_ttl("p2", "shared", v2, 60).await.unwrap();
        store.remove("p1", "shared").await.unwrap();

        assert!(store.get("p1", "shared").await.unwrap().is_none());
        assert_eq!(store.get("p2", "shared").await.unwrap().unwrap().value, "two");
    }

    #[tokio::test]
    async fn test_overwrite_existing_key() {
        let store = InMemoryCacheStore::new();
        let original = CacheData {
            value: "original".to_string(),
        };
        let replacement = CacheData {
            value: "replacement".to_string(),
        };

        store.put_with_ttl("test", "key1", original, 60).await.unwrap();
        store.put_with_ttl("test", "key1", replacement, 60).await.unwrap();

        let retrieved = store.get("test", "key1").await.unwrap().unwrap();
        assert_eq!(retrieved.value, "replacement");
    }
}
