//! Change-feed event types.
//!
//! The data backend delivers row-level changes as [`ChangeEvent`]s over a
//! subscription channel. Payloads stay as raw JSON rows; decoding into
//! typed rows happens at the consumer, which knows which table it asked
//! for.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend tables consumed by the notification feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Job applications.
    Applications,
    /// Job postings.
    Jobs,
    /// Employer profile rows.
    EmployerProfiles,
    /// Jobseeker profile rows.
    JobseekerProfiles,
    /// Direct notification rows.
    Notifications,
    /// Pending job vacancy rows awaiting admin review.
    Jobvacancypending,
}

impl Table {
    /// Return the table as its backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::Jobs => "jobs",
            Self::EmployerProfiles => "employer_profiles",
            Self::JobseekerProfiles => "jobseeker_profiles",
            Self::Notifications => "notifications",
            Self::Jobvacancypending => "jobvacancypending",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of row change an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A new row was inserted.
    Insert,
    /// An existing row was updated.
    Update,
}

/// A single row-level change pushed by the data backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Insert or update.
    pub kind: ChangeKind,
    /// The table the row belongs to.
    pub table: Table,
    /// The previous row state (updates only).
    pub old: Option<Value>,
    /// The new row state.
    pub new: Value,
}

/// Which tables a subscription wants to observe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// Tables to receive change events for.
    pub tables: Vec<Table>,
}

impl ChannelSpec {
    /// Build a spec for the given tables.
    pub fn tables(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Whether an event for the given table matches this spec.
    pub fn matches(&self, table: Table) -> bool {
        self.tables.contains(&table)
    }
}
