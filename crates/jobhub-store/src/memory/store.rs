//! In-memory key-value store implementation.

use async_trait::async_trait;
use dashmap::DashMap;

use jobhub_core::result::AppResult;
use jobhub_core::traits::kv::KeyValueStore;

/// In-memory key-value store.
///
/// A plain map without TTL or eviction: entries persist for the lifetime
/// of the process, matching the never-expire contract of the store trait.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    /// Key → JSON string value.
    entries: DashMap<String, String>,
}

impl MemoryKeyValueStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "v").await.expect("set");
        assert_eq!(store.get("k").await.expect("get").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("absent").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "old").await.expect("set");
        store.set("k", "new").await.expect("set");
        assert_eq!(store.get("k").await.expect("get").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "v").await.expect("set");
        assert!(store.delete("k").await.expect("delete"));
        assert!(!store.delete("k").await.expect("delete"));
        assert!(!store.exists("k").await.expect("exists"));
    }
}
