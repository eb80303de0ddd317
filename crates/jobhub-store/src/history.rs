//! Typed accessor for the persisted notification history.

use std::sync::Arc;

use tracing::warn;

use jobhub_core::result::AppResult;
use jobhub_core::traits::kv::KeyValueStore;
use jobhub_core::types::id::UserId;
use jobhub_entity::notification::Notification;
use jobhub_entity::role::UserRole;

use crate::keys;

/// Reads and writes the materialized notification history for one
/// `(user, role)` scope.
///
/// History is always written as a whole value: both update paths (poll
/// reconciliation and realtime fold-in) read the full list, compute, and
/// write the full list back, so a write never clobbers an unrelated field.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    /// Underlying key-value store.
    store: Arc<dyn KeyValueStore>,
    /// Scoped key.
    key: String,
}

impl HistoryStore {
    /// Create an accessor for the given scope.
    pub fn new(store: Arc<dyn KeyValueStore>, user: UserId, role: UserRole) -> Self {
        Self {
            key: keys::notification_history(user, role),
            store,
        }
    }

    /// Load the history. A missing key is an empty history; a corrupt
    /// value is logged and treated as empty (the next snapshot rebuilds
    /// it).
    pub async fn load(&self) -> AppResult<Vec<Notification>> {
        match self.store.get(&self.key).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(history) => Ok(history),
                Err(e) => {
                    warn!("Discarding corrupt history at '{}': {e}", self.key);
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    /// Persist the history, replacing the previous value.
    pub async fn save(&self, history: &[Notification]) -> AppResult<()> {
        let raw = serde_json::to_string(history)?;
        self.store.set(&self.key, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKeyValueStore;

    use chrono::Utc;
    use uuid::Uuid;

    use jobhub_core::types::id::{NotificationId, SourceKind};
    use jobhub_entity::notification::NotificationKind;
    use jobhub_entity::record::{PendingJobRecord, SourceRecord};
    use jobhub_entity::rows::{PendingJobRow, PendingJobStatus};

    fn sample_notification() -> Notification {
        let row = PendingJobRow {
            id: jobhub_core::types::id::PendingJobId::new(),
            employer_id: None,
            job_title: Some("Forklift Operator".to_string()),
            status: PendingJobStatus::Pending,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let ts = row.created_at.unwrap();
        Notification {
            id: NotificationId::new(SourceKind::Jobvacancy, row.id.into_uuid(), ts),
            source: SourceKind::Jobvacancy,
            kind: NotificationKind::Info,
            message: "New job posting pending approval".to_string(),
            timestamp: ts,
            read: false,
            record: SourceRecord::PendingJob(PendingJobRecord {
                row,
                employer_name: None,
            }),
        }
    }

    #[tokio::test]
    async fn test_history_roundtrip() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let history = HistoryStore::new(store, UserId::new(), UserRole::Admin);

        let entry = sample_notification();
        history.save(&[entry.clone()]).await.expect("save");

        let loaded = history.load().await.expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, entry.id);
        assert_eq!(loaded[0].message, entry.message);
    }

    #[tokio::test]
    async fn test_missing_history_is_empty() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let history = HistoryStore::new(store, UserId::new(), UserRole::Admin);
        assert!(history.load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_history_is_discarded() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let user = UserId::new();
        store
            .set(&keys::notification_history(user, UserRole::Admin), "{oops")
            .await
            .expect("set");

        let history = HistoryStore::new(store, user, UserRole::Admin);
        assert!(history.load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn test_scopes_are_independent() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let user = UserId::new();
        let admin = HistoryStore::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, user, UserRole::Admin);
        let employer = HistoryStore::new(store, user, UserRole::Employer);

        admin.save(&[sample_notification()]).await.expect("save");
        assert!(employer.load().await.expect("load").is_empty());
    }
}
