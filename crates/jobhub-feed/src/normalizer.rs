//! Source record normalization.
//!
//! Turns an enriched source record into a feed notification for a given
//! viewing role: stable identity, coarse classification, and a rendered
//! message. Pure functions; read-state is stamped by the caller.

use chrono::Utc;

use jobhub_core::types::id::NotificationId;
use jobhub_entity::notification::{Notification, NotificationKind};
use jobhub_entity::record::{ApplicationRecord, PendingJobRecord, SourceRecord};
use jobhub_entity::role::UserRole;
use jobhub_entity::rows::{ApplicationStatus, PendingJobStatus};

/// Normalize an enriched record into a notification for the given role.
///
/// The identity timestamp is the record's latest event time; rows that
/// carry no timestamp at all fall back to the current instant, which keeps
/// them at the top of the feed until the backend supplies a real one.
pub fn normalize(record: SourceRecord, role: UserRole) -> Notification {
    let timestamp = record.event_time().unwrap_or_else(Utc::now);
    let id = NotificationId::new(record.source_kind(), record.record_id(), timestamp);

    Notification {
        id,
        source: record.source_kind(),
        kind: classify(&record, role),
        message: render_message(&record, role),
        timestamp,
        read: false,
        record,
    }
}

/// Derive the coarse classification for a record and role.
fn classify(record: &SourceRecord, role: UserRole) -> NotificationKind {
    match record {
        SourceRecord::Direct(row) => NotificationKind::from_free_text(&row.notice_type),
        SourceRecord::Application(r) => match role {
            UserRole::Jobseeker => match r.row.status {
                ApplicationStatus::Accepted => NotificationKind::Success,
                ApplicationStatus::Rejected => NotificationKind::Error,
                ApplicationStatus::Referred | ApplicationStatus::Pending => NotificationKind::Info,
            },
            // Employers only see non-terminal application activity.
            _ => NotificationKind::Info,
        },
        SourceRecord::PendingJob(r) => match role {
            UserRole::Admin => match r.row.status {
                PendingJobStatus::Approved => NotificationKind::Success,
                PendingJobStatus::Rejected => NotificationKind::Error,
                PendingJobStatus::Pending => NotificationKind::Info,
            },
            _ => NotificationKind::Info,
        },
    }
}

/// Render the human-readable message for a record and role.
fn render_message(record: &SourceRecord, role: UserRole) -> String {
    match record {
        SourceRecord::Application(r) => match role {
            UserRole::Jobseeker => jobseeker_application_message(r),
            _ => employer_application_message(r),
        },
        SourceRecord::Direct(row) => row.message.clone(),
        SourceRecord::PendingJob(r) => pending_job_message(r),
    }
}

fn jobseeker_application_message(r: &ApplicationRecord) -> String {
    let job = r
        .job
        .as_ref()
        .map(|j| j.title.as_str())
        .unwrap_or("a job");

    match r.row.status {
        ApplicationStatus::Accepted => match &r.employer_name {
            Some(employer) => {
                format!("Your application for {job} was accepted by {employer}")
            }
            None => format!("Your application for {job} was accepted"),
        },
        ApplicationStatus::Rejected => format!("Your application for {job} was rejected"),
        ApplicationStatus::Referred => {
            format!("Your application for {job} was referred to the employer")
        }
        ApplicationStatus::Pending => format!("Your application for {job} was submitted"),
    }
}

fn employer_application_message(r: &ApplicationRecord) -> String {
    let applicant = r.applicant_name.as_deref().unwrap_or("A jobseeker");
    let job = r
        .job
        .as_ref()
        .map(|j| j.title.as_str())
        .unwrap_or("your job posting");

    match r.row.status {
        ApplicationStatus::Referred => {
            format!("{applicant}'s application for {job} was referred")
        }
        _ => format!("{applicant} applied for {job}"),
    }
}

fn pending_job_message(r: &PendingJobRecord) -> String {
    let title = r.row.job_title.as_deref().unwrap_or("A job posting");

    match r.row.status {
        PendingJobStatus::Pending => match &r.employer_name {
            Some(employer) => format!("{title} from {employer} is pending approval"),
            None => format!("{title} is pending approval"),
        },
        PendingJobStatus::Approved => format!("{title} was approved"),
        PendingJobStatus::Rejected => format!("{title} was rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    use jobhub_core::types::id::{ApplicationId, JobId, NoticeId, PendingJobId, SourceKind, UserId};
    use jobhub_entity::rows::{ApplicationRow, DirectNotificationRow, JobRow, PendingJobRow};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn application(status: ApplicationStatus) -> ApplicationRecord {
        let job_id = JobId::new();
        ApplicationRecord {
            row: ApplicationRow {
                id: ApplicationId::new(),
                job_id,
                jobseeker_id: UserId::new(),
                status,
                applied_at: Some(ts("2024-05-01T08:00:00Z")),
                created_at: Some(ts("2024-05-01T08:00:00Z")),
                updated_at: Some(ts("2024-05-02T09:30:00Z")),
            },
            job: Some(JobRow {
                id: job_id,
                employer_id: UserId::new(),
                title: "Line Cook".to_string(),
                created_at: None,
            }),
            employer_name: Some("Harbor Grill".to_string()),
            applicant_name: Some("Dana Reyes".to_string()),
        }
    }

    #[test]
    fn test_identity_is_stable_across_calls() {
        let record = SourceRecord::Application(application(ApplicationStatus::Pending));
        let a = normalize(record.clone(), UserRole::Jobseeker);
        let b = normalize(record, UserRole::Jobseeker);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_identity_uses_updated_at_over_created_at() {
        let record = application(ApplicationStatus::Accepted);
        let n = normalize(SourceRecord::Application(record), UserRole::Jobseeker);
        assert_eq!(n.timestamp, ts("2024-05-02T09:30:00Z"));
        assert_eq!(n.id.timestamp, n.timestamp);
    }

    #[test]
    fn test_status_change_yields_new_identity() {
        let mut record = application(ApplicationStatus::Pending);
        let before = normalize(
            SourceRecord::Application(record.clone()),
            UserRole::Jobseeker,
        );

        record.row.status = ApplicationStatus::Accepted;
        record.row.updated_at = Some(ts("2024-05-03T10:00:00Z"));
        let after = normalize(SourceRecord::Application(record), UserRole::Jobseeker);

        assert_ne!(before.id, after.id);
        assert_eq!(before.id.record, after.id.record);
    }

    #[test]
    fn test_jobseeker_pending_is_info_with_job_title() {
        let n = normalize(
            SourceRecord::Application(application(ApplicationStatus::Pending)),
            UserRole::Jobseeker,
        );
        assert_eq!(n.kind, NotificationKind::Info);
        assert!(n.message.contains("Line Cook"));
    }

    #[test]
    fn test_jobseeker_accepted_names_employer() {
        let n = normalize(
            SourceRecord::Application(application(ApplicationStatus::Accepted)),
            UserRole::Jobseeker,
        );
        assert_eq!(n.kind, NotificationKind::Success);
        assert!(n.message.contains("Line Cook"));
        assert!(n.message.contains("Harbor Grill"));
    }

    #[test]
    fn test_jobseeker_rejected_is_error() {
        let n = normalize(
            SourceRecord::Application(application(ApplicationStatus::Rejected)),
            UserRole::Jobseeker,
        );
        assert_eq!(n.kind, NotificationKind::Error);
    }

    #[test]
    fn test_employer_view_is_always_info() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Referred,
            ApplicationStatus::Accepted,
        ] {
            let n = normalize(
                SourceRecord::Application(application(status)),
                UserRole::Employer,
            );
            assert_eq!(n.kind, NotificationKind::Info);
        }
    }

    #[test]
    fn test_employer_message_names_applicant_and_job() {
        let n = normalize(
            SourceRecord::Application(application(ApplicationStatus::Pending)),
            UserRole::Employer,
        );
        assert!(n.message.contains("Dana Reyes"));
        assert!(n.message.contains("Line Cook"));
    }

    #[test]
    fn test_missing_enrichment_falls_back_to_generic_phrasing() {
        let mut record = application(ApplicationStatus::Accepted);
        record.job = None;
        record.employer_name = None;
        let n = normalize(SourceRecord::Application(record), UserRole::Jobseeker);
        assert!(n.message.contains("a job"));
        assert_eq!(n.kind, NotificationKind::Success);
    }

    #[test]
    fn test_direct_notice_classified_by_free_text() {
        let row = DirectNotificationRow {
            id: NoticeId::new(),
            recipient_id: UserId::new(),
            notice_type: "account verified".to_string(),
            message: "Your company account has been verified".to_string(),
            created_at: Some(ts("2024-05-01T12:00:00Z")),
        };
        let n = normalize(SourceRecord::Direct(row), UserRole::Employer);
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.source, SourceKind::Notification);
        assert!(n.message.contains("verified"));
    }

    #[test]
    fn test_admin_pending_job_messages() {
        let row = PendingJobRow {
            id: PendingJobId::new(),
            employer_id: Some(UserId::new()),
            job_title: Some("Night Guard".to_string()),
            status: PendingJobStatus::Pending,
            created_at: Some(ts("2024-05-01T12:00:00Z")),
            updated_at: None,
        };
        let n = normalize(
            SourceRecord::PendingJob(PendingJobRecord {
                row,
                employer_name: Some("Iron Gate Security".to_string()),
            }),
            UserRole::Admin,
        );
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.source, SourceKind::Jobvacancy);
        assert!(n.message.contains("Night Guard"));
        assert!(n.message.contains("Iron Gate Security"));
    }

    #[test]
    fn test_admin_approved_is_success() {
        let row = PendingJobRow {
            id: PendingJobId::new(),
            employer_id: None,
            job_title: None,
            status: PendingJobStatus::Approved,
            created_at: Some(ts("2024-05-01T12:00:00Z")),
            updated_at: Some(ts("2024-05-02T12:00:00Z")),
        };
        let n = normalize(
            SourceRecord::PendingJob(PendingJobRecord {
                row,
                employer_name: None,
            }),
            UserRole::Admin,
        );
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.timestamp, ts("2024-05-02T12:00:00Z"));
    }

    #[test]
    fn test_notification_id_string_shape() {
        let record = application(ApplicationStatus::Pending);
        let record_id = record.row.id.into_uuid();
        let n = normalize(SourceRecord::Application(record), UserRole::Jobseeker);
        let rendered = n.id.to_string();
        assert!(rendered.starts_with("application_"));
        assert!(rendered.contains(&record_id.to_string()));
    }
}
