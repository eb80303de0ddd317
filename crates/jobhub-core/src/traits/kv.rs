//! Key-value store trait for pluggable persistence backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the persistent key-value store that holds per-user read-state
/// and notification history.
///
/// All values are strings (JSON). Unlike a cache, entries have no TTL and
/// must never be evicted: read-state that silently expires would resurrect
/// already-acknowledged notifications as unread.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, overwriting any existing entry.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
