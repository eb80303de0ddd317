//! Job posting row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobhub_core::types::id::{JobId, UserId};

/// A row from the `jobs` table, trimmed to the columns the feed joins on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRow {
    /// Row primary key.
    pub id: JobId,
    /// The employer that owns this posting.
    pub employer_id: UserId,
    /// Posting title.
    pub title: String,
    /// When the posting was created.
    pub created_at: Option<DateTime<Utc>>,
}
