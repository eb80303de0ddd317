//! Direct notification row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobhub_core::types::id::{NoticeId, UserId};

/// A row from the `notifications` table: a message written directly to a
/// recipient by another part of the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectNotificationRow {
    /// Row primary key.
    pub id: NoticeId,
    /// The addressed user.
    pub recipient_id: UserId,
    /// Free-text classification written by the producer
    /// (e.g. "account verified", "job rejected").
    #[serde(rename = "type")]
    pub notice_type: String,
    /// Message body.
    pub message: String,
    /// When the row was created.
    pub created_at: Option<DateTime<Utc>>,
}
