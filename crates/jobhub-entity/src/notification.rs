//! Feed notification entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use jobhub_core::types::id::{NotificationId, SourceKind};

use crate::record::SourceRecord;

/// Visual classification of a feed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A positive outcome (accepted, approved, verified).
    Success,
    /// A negative outcome (rejected, denied).
    Error,
    /// Everything else.
    Info,
}

impl NotificationKind {
    /// Classify a free-text notice type by substring.
    ///
    /// Producers write arbitrary labels like "account verified" or
    /// "job posting rejected"; the feed only needs the coarse outcome.
    pub fn from_free_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("approved") || text.contains("verified") || text.contains("success") {
            Self::Success
        } else if text.contains("rejected") || text.contains("denied") || text.contains("error") {
            Self::Error
        } else {
            Self::Info
        }
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification as rendered into the per-user feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Stable identity: source + record + timestamp.
    pub id: NotificationId,
    /// Which source produced this notification.
    pub source: SourceKind,
    /// Coarse classification for rendering.
    pub kind: NotificationKind,
    /// Human-readable message.
    pub message: String,
    /// Event timestamp; also the feed sort key (descending).
    pub timestamp: DateTime<Utc>,
    /// Whether the user has acknowledged this notification. Authoritative
    /// source is the read-state store at last reconciliation.
    pub read: bool,
    /// The enriched record, retained for click-through navigation.
    pub record: SourceRecord,
}

impl Notification {
    /// Check if the notification has not been acknowledged yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}
