//! History reconciliation.
//!
//! Merges a freshly normalized snapshot batch into the persisted history:
//! read flags are sticky for identities that already exist, genuinely new
//! identities default from the acknowledged-id set, retained entries keep
//! their state, and the result is re-sorted and trimmed to the retention
//! bound. Read-flag propagation always happens before truncation so a
//! trimmed entry can never take an acknowledgement with it.

use std::collections::{HashMap, HashSet};

use jobhub_core::types::id::NotificationId;
use jobhub_entity::notification::Notification;

/// The result of merging a batch into history.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The updated history: unique ids, newest first, at most `cap` long.
    pub history: Vec<Notification>,
    /// Number of unacknowledged entries in the updated history.
    pub unread: usize,
}

/// Merge `incoming` into `existing`.
///
/// The same identity can arrive in every snapshot for as long as the
/// underlying row stays current, so an id match means "same event seen
/// again", never "new event".
pub fn reconcile(
    existing: Vec<Notification>,
    incoming: Vec<Notification>,
    read_ids: &HashSet<NotificationId>,
    cap: usize,
) -> ReconcileOutcome {
    let existing_read: HashMap<NotificationId, bool> =
        existing.iter().map(|n| (n.id, n.read)).collect();

    let mut merged: Vec<Notification> = Vec::with_capacity(existing.len() + incoming.len());
    let mut merged_ids: HashSet<NotificationId> = HashSet::with_capacity(incoming.len());

    for mut notification in incoming {
        if !merged_ids.insert(notification.id) {
            // Duplicate within the batch itself (e.g. overlapping
            // sub-queries); first occurrence wins.
            continue;
        }
        let sticky = existing_read
            .get(&notification.id)
            .copied()
            .unwrap_or(false);
        notification.read = sticky || read_ids.contains(&notification.id);
        merged.push(notification);
    }

    for notification in existing {
        if !merged_ids.contains(&notification.id) {
            merged_ids.insert(notification.id);
            merged.push(notification);
        }
    }

    // Stable sort: equal timestamps keep their merge order, which makes
    // tie ordering deterministic within a run.
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged.truncate(cap);

    let unread = merged.iter().filter(|n| !n.read).count();

    ReconcileOutcome {
        history: merged,
        unread,
    }
}
