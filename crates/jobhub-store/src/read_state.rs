//! Typed accessor for the persisted acknowledged-id set.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use jobhub_core::result::AppResult;
use jobhub_core::traits::kv::KeyValueStore;
use jobhub_core::types::id::{NotificationId, UserId};
use jobhub_entity::role::UserRole;

use crate::keys;

/// Reads and writes the acknowledged-notification-id set for one
/// `(user, role)` scope. The set only grows; acknowledgements survive
/// reloads and history eviction.
#[derive(Debug, Clone)]
pub struct ReadStateStore {
    /// Underlying key-value store.
    store: Arc<dyn KeyValueStore>,
    /// Scoped key.
    key: String,
}

impl ReadStateStore {
    /// Create an accessor for the given scope.
    pub fn new(store: Arc<dyn KeyValueStore>, user: UserId, role: UserRole) -> Self {
        Self {
            key: keys::read_notifications(user, role),
            store,
        }
    }

    /// Load the acknowledged set. A missing key is an empty set; a corrupt
    /// value is logged and treated as empty rather than wedging the feed.
    pub async fn load(&self) -> AppResult<HashSet<NotificationId>> {
        match self.store.get(&self.key).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(ids) => Ok(ids),
                Err(e) => {
                    warn!("Discarding corrupt read-state at '{}': {e}", self.key);
                    Ok(HashSet::new())
                }
            },
            None => Ok(HashSet::new()),
        }
    }

    /// Persist the acknowledged set, replacing the previous value.
    pub async fn save(&self, ids: &HashSet<NotificationId>) -> AppResult<()> {
        let raw = serde_json::to_string(ids)?;
        self.store.set(&self.key, &raw).await
    }
}
