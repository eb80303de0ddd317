//! Store key builders for all JobHub persisted entries.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the application uses. Keys are scoped by user *and* role: an
//! account that acts as both employer and admin keeps independent feeds.

use jobhub_core::types::id::UserId;
use jobhub_entity::role::UserRole;

/// Store key for the acknowledged-notification-id set of a feed scope.
pub fn read_notifications(user: UserId, role: UserRole) -> String {
    format!("read_notifications_{user}_{role}")
}

/// Store key for the materialized notification history of a feed scope.
pub fn notification_history(user: UserId, role: UserRole) -> String {
    format!("notification_history_{user}_{role}")
}
