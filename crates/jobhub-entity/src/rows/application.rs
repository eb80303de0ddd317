//! Job application row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use jobhub_core::types::id::{ApplicationId, JobId, UserId};

/// Lifecycle status of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Submitted, awaiting employer action.
    Pending,
    /// Forwarded to the employer's hiring contact.
    Referred,
    /// Accepted by the employer.
    Accepted,
    /// Rejected by the employer.
    Rejected,
}

impl ApplicationStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Referred => "referred",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Whether this status ends the application lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row from the `applications` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRow {
    /// Row primary key.
    pub id: ApplicationId,
    /// The job applied to.
    pub job_id: JobId,
    /// The applying jobseeker.
    pub jobseeker_id: UserId,
    /// Current status.
    pub status: ApplicationStatus,
    /// When the application was submitted.
    pub applied_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the row was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ApplicationRow {
    /// The timestamp that identifies this row's latest event: last update,
    /// else creation, else submission.
    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at).or(self.applied_at)
    }
}
