use async_trait::async_trait;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

/// Keyed store with TTL backing session-scoped state.
///
/// Methods take `&self`; implementations handle their own interior
/// mutability so a store can be shared behind an `Arc` across request
/// handlers.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Verify the store is reachable.
    async fn init(&self) -> Result<(), StorageError>;

    /// Put a value into the store, expiring after `ttl` seconds.
    async fn put_with_ttl(
        &self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: u64,
    ) -> Result<(), StorageError>;

    /// Get a value from the store. Expired values are treated as absent.
    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove a value from the store.
    async fn remove(&self, prefix: &str, key: &str) -> Result<(), StorageError>;
}
