//! The tagged source-record union.
//!
//! Every notification carries the enriched record it was derived from, so
//! the UI can navigate to the underlying application, notice, or pending
//! posting. Each source variant carries its own enrichment payload;
//! consumers dispatch by pattern matching rather than probing for fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobhub_core::types::id::SourceKind;

use crate::rows::{ApplicationRow, DirectNotificationRow, JobRow, PendingJobRow};

/// An application row joined with the reference data message rendering
/// needs. Enrichment fields stay `None` when a join fails; rendering falls
/// back to generic phrasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// The application itself.
    pub row: ApplicationRow,
    /// The job applied to.
    pub job: Option<JobRow>,
    /// Display name of the job's employer.
    pub employer_name: Option<String>,
    /// Display name of the applicant.
    pub applicant_name: Option<String>,
}

/// A pending job vacancy joined with its employer display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingJobRecord {
    /// The pending vacancy itself.
    pub row: PendingJobRow,
    /// Display name of the submitting employer.
    pub employer_name: Option<String>,
}

/// An enriched record from one of the three notification sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRecord {
    /// A job application (jobseeker and employer feeds).
    Application(ApplicationRecord),
    /// A direct notification row (employer feeds).
    Direct(DirectNotificationRow),
    /// A pending job vacancy (admin feeds).
    PendingJob(PendingJobRecord),
}

impl SourceRecord {
    /// The source kind this record maps to.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::Application(_) => SourceKind::Application,
            Self::Direct(_) => SourceKind::Notification,
            Self::PendingJob(_) => SourceKind::Jobvacancy,
        }
    }

    /// The underlying row's primary key.
    pub fn record_id(&self) -> Uuid {
        match self {
            Self::Application(r) => r.row.id.into_uuid(),
            Self::Direct(row) => row.id.into_uuid(),
            Self::PendingJob(r) => r.row.id.into_uuid(),
        }
    }

    /// The timestamp of the row's latest event, when the row carries one.
    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Application(r) => r.row.event_time(),
            Self::Direct(row) => row.created_at,
            Self::PendingJob(r) => r.row.event_time(),
        }
    }
}
