//! Pending job vacancy row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use jobhub_core::types::id::{PendingJobId, UserId};

/// Review status of a submitted job vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingJobStatus {
    /// Awaiting admin review.
    Pending,
    /// Approved and published.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

impl PendingJobStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PendingJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row from the `jobvacancypending` table: a job posting awaiting admin
/// approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingJobRow {
    /// Row primary key.
    pub id: PendingJobId,
    /// The submitting employer.
    pub employer_id: Option<UserId>,
    /// Title of the submitted posting.
    pub job_title: Option<String>,
    /// Current review status.
    pub status: PendingJobStatus,
    /// When the row was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the row was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl PendingJobRow {
    /// The timestamp that identifies this row's latest event.
    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}
