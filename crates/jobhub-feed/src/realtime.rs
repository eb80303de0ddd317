//! Realtime change-event handling.
//!
//! Turns a single push-delivered row change into a feed notification for
//! one `(user, role)` scope: decode, relevance check, employer terminal-
//! transition suppression, async enrichment, normalization. Folding the
//! result into feed state belongs to the service; this module never
//! touches shared state.

use std::sync::Arc;

use tracing::{debug, warn};

use jobhub_backend::queries;
use jobhub_core::events::{ChangeEvent, ChangeKind, Table};
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::types::id::UserId;
use jobhub_entity::notification::Notification;
use jobhub_entity::record::{ApplicationRecord, PendingJobRecord, SourceRecord};
use jobhub_entity::role::UserRole;
use jobhub_entity::rows::{ApplicationRow, DirectNotificationRow, PendingJobRow};

use crate::normalizer;

/// Processes change events for one feed scope.
#[derive(Debug, Clone)]
pub struct RealtimeHandler {
    /// Data backend for enrichment lookups.
    backend: Arc<dyn DataBackend>,
    /// The viewing user.
    user: UserId,
    /// The viewing role.
    role: UserRole,
}

impl RealtimeHandler {
    /// Create a handler for one feed scope.
    pub fn new(backend: Arc<dyn DataBackend>, user: UserId, role: UserRole) -> Self {
        Self {
            backend,
            user,
            role,
        }
    }

    /// The tables this scope's subscription should observe.
    pub fn watched_tables(role: UserRole) -> Vec<Table> {
        match role {
            UserRole::Jobseeker => vec![Table::Applications],
            UserRole::Employer => vec![Table::Applications, Table::Notifications],
            UserRole::Admin => vec![Table::Jobvacancypending],
        }
    }

    /// Process one change event into a notification.
    ///
    /// Returns `None` for events that are irrelevant to this scope,
    /// suppressed, or undecodable. The returned notification carries
    /// `read = false`; the caller stamps read-state when folding.
    pub async fn process(&self, event: ChangeEvent) -> Option<Notification> {
        match event.table {
            Table::Applications => self.process_application(event).await,
            Table::Notifications => self.process_notice(event),
            Table::Jobvacancypending => self.process_pending_job(event).await,
            _ => None,
        }
    }

    async fn process_application(&self, event: ChangeEvent) -> Option<Notification> {
        let row: ApplicationRow = decode(&event.table, event.new)?;

        match self.role {
            UserRole::Jobseeker => {
                if row.jobseeker_id != self.user {
                    return None;
                }

                let job = match queries::jobs::by_id(&*self.backend, row.job_id).await {
                    Ok(job) => job,
                    Err(e) => {
                        debug!("Job enrichment failed for application {}: {e}", row.id);
                        None
                    }
                };
                let employer_name = match &job {
                    Some(job) => self.employer_name(job.employer_id).await,
                    None => None,
                };

                Some(normalizer::normalize(
                    SourceRecord::Application(ApplicationRecord {
                        row,
                        job,
                        employer_name,
                        applicant_name: None,
                    }),
                    self.role,
                ))
            }
            UserRole::Employer => {
                // Terminal transitions are the employer's own decisions:
                // an update that lands on accepted/rejected emits nothing.
                if event.kind == ChangeKind::Update && row.status.is_terminal() {
                    let old_status = event
                        .old
                        .as_ref()
                        .and_then(|old| decode::<ApplicationRow>(&event.table, old.clone()))
                        .map(|old| old.status);
                    if old_status != Some(row.status) {
                        debug!(
                            "Suppressing terminal application update {} ({})",
                            row.id, row.status
                        );
                        return None;
                    }
                }

                // Ownership check requires the job; an unresolvable job
                // means the event cannot be attributed to this employer.
                let job = match queries::jobs::by_id(&*self.backend, row.job_id).await {
                    Ok(Some(job)) => job,
                    Ok(None) => return None,
                    Err(e) => {
                        warn!("Ownership lookup failed for application {}: {e}", row.id);
                        return None;
                    }
                };
                if job.employer_id != self.user {
                    return None;
                }

                let applicant_name = self.jobseeker_name(row.jobseeker_id).await;

                Some(normalizer::normalize(
                    SourceRecord::Application(ApplicationRecord {
                        row,
                        job: Some(job),
                        employer_name: None,
                        applicant_name,
                    }),
                    self.role,
                ))
            }
            UserRole::Admin => None,
        }
    }

    fn process_notice(&self, event: ChangeEvent) -> Option<Notification> {
        if self.role != UserRole::Employer {
            return None;
        }

        let row: DirectNotificationRow = decode(&event.table, event.new)?;
        if row.recipient_id != self.user {
            return None;
        }

        Some(normalizer::normalize(SourceRecord::Direct(row), self.role))
    }

    async fn process_pending_job(&self, event: ChangeEvent) -> Option<Notification> {
        if self.role != UserRole::Admin {
            return None;
        }

        let row: PendingJobRow = decode(&event.table, event.new)?;
        let employer_name = match row.employer_id {
            Some(employer) => self.employer_name(employer).await,
            None => None,
        };

        Some(normalizer::normalize(
            SourceRecord::PendingJob(PendingJobRecord {
                row,
                employer_name,
            }),
            self.role,
        ))
    }

    async fn employer_name(&self, user: UserId) -> Option<String> {
        match queries::profiles::employer_by_user(&*self.backend, user).await {
            Ok(profile) => profile.and_then(|p| p.display_name()),
            Err(e) => {
                debug!("Employer enrichment failed for {user}: {e}");
                None
            }
        }
    }

    async fn jobseeker_name(&self, user: UserId) -> Option<String> {
        match queries::profiles::jobseeker_by_user(&*self.backend, user).await {
            Ok(profile) => profile.and_then(|p| p.display_name()),
            Err(e) => {
                debug!("Jobseeker enrichment failed for {user}: {e}");
                None
            }
        }
    }
}

/// Decode an event payload into a typed row, logging and dropping rows
/// that fail to parse.
fn decode<T: serde::de::DeserializeOwned>(table: &Table, value: serde_json::Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(row) => Some(row),
        Err(e) => {
            warn!("Dropping undecodable change event for '{table}': {e}");
            None
        }
    }
}
