//! Snapshot fetching.
//!
//! Produces the current set of interesting source records for one
//! `(user, role)` scope, joined with the reference data message rendering
//! needs. Every sub-query failure degrades to zero records from that
//! source; the fetch as a whole never aborts.

use std::sync::Arc;

use tracing::{debug, warn};

use jobhub_backend::queries;
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::types::id::{JobId, UserId};
use jobhub_entity::record::{ApplicationRecord, PendingJobRecord, SourceRecord};
use jobhub_entity::role::UserRole;
use jobhub_entity::rows::{ApplicationStatus, JobRow, PendingJobStatus};

/// Fetches role-scoped snapshots of the notification sources.
///
/// Stateless between calls: each fetch computes a full result, so a poll
/// tick racing a manual refresh cannot corrupt anything.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    /// Data backend to query.
    backend: Arc<dyn DataBackend>,
    /// The viewing user; `None` makes the fetcher inert.
    user: Option<UserId>,
    /// The viewing role.
    role: UserRole,
    /// Row cap per sub-query.
    limit: u32,
}

impl SnapshotFetcher {
    /// Create a fetcher for one feed scope.
    pub fn new(
        backend: Arc<dyn DataBackend>,
        user: Option<UserId>,
        role: UserRole,
        limit: u32,
    ) -> Self {
        Self {
            backend,
            user,
            role,
            limit,
        }
    }

    /// Fetch the current source records for this scope.
    pub async fn fetch(&self) -> Vec<SourceRecord> {
        let Some(user) = self.user else {
            return Vec::new();
        };

        match self.role {
            UserRole::Jobseeker => self.fetch_jobseeker(user).await,
            UserRole::Employer => self.fetch_employer(user).await,
            UserRole::Admin => self.fetch_admin().await,
        }
    }

    /// The jobseeker's own applications, each joined with its job and the
    /// job's employer display name.
    async fn fetch_jobseeker(&self, user: UserId) -> Vec<SourceRecord> {
        let applications =
            match queries::applications::for_jobseeker(&*self.backend, user, self.limit).await {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Applications snapshot failed for jobseeker {user}: {e}");
                    return Vec::new();
                }
            };

        let mut records = Vec::with_capacity(applications.len());
        for row in applications {
            let job = self.lookup_job(row.job_id).await;
            let employer_name = match &job {
                Some(job) => self.lookup_employer_name(job.employer_id).await,
                None => None,
            };
            records.push(SourceRecord::Application(ApplicationRecord {
                row,
                job,
                employer_name,
                applicant_name: None,
            }));
        }
        records
    }

    /// Applications against the employer's jobs (pending and referred
    /// only) plus direct notices addressed to the employer.
    async fn fetch_employer(&self, user: UserId) -> Vec<SourceRecord> {
        let mut records = Vec::new();

        match queries::jobs::for_employer(&*self.backend, user).await {
            Ok(jobs) => {
                let job_ids: Vec<JobId> = jobs.iter().map(|j| j.id).collect();
                match queries::applications::for_jobs_with_status(
                    &*self.backend,
                    &job_ids,
                    &[ApplicationStatus::Pending, ApplicationStatus::Referred],
                    self.limit,
                )
                .await
                {
                    Ok(applications) => {
                        for row in applications {
                            let job = jobs.iter().find(|j| j.id == row.job_id).cloned();
                            let applicant_name =
                                self.lookup_jobseeker_name(row.jobseeker_id).await;
                            records.push(SourceRecord::Application(ApplicationRecord {
                                row,
                                job,
                                employer_name: None,
                                applicant_name,
                            }));
                        }
                    }
                    Err(e) => {
                        warn!("Applications snapshot failed for employer {user}: {e}");
                    }
                }
            }
            Err(e) => {
                warn!("Job listing failed for employer {user}: {e}");
            }
        }

        match queries::notices::for_recipient(&*self.backend, user, self.limit).await {
            Ok(notices) => {
                records.extend(notices.into_iter().map(SourceRecord::Direct));
            }
            Err(e) => {
                warn!("Notice snapshot failed for employer {user}: {e}");
            }
        }

        records
    }

    /// Pending job vacancies awaiting review, joined with the submitting
    /// employer's display name.
    async fn fetch_admin(&self) -> Vec<SourceRecord> {
        let pending =
            match queries::pending::with_status(&*self.backend, PendingJobStatus::Pending, self.limit)
                .await
            {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Pending-job snapshot failed: {e}");
                    return Vec::new();
                }
            };

        let mut records = Vec::with_capacity(pending.len());
        for row in pending {
            let employer_name = match row.employer_id {
                Some(employer) => self.lookup_employer_name(employer).await,
                None => None,
            };
            records.push(SourceRecord::PendingJob(PendingJobRecord {
                row,
                employer_name,
            }));
        }
        records
    }

    async fn lookup_job(&self, job: JobId) -> Option<JobRow> {
        match queries::jobs::by_id(&*self.backend, job).await {
            Ok(row) => row,
            Err(e) => {
                debug!("Job join failed for {job}: {e}");
                None
            }
        }
    }

    async fn lookup_employer_name(&self, user: UserId) -> Option<String> {
        match queries::profiles::employer_by_user(&*self.backend, user).await {
            Ok(profile) => profile.and_then(|p| p.display_name()),
            Err(e) => {
                debug!("Employer profile join failed for {user}: {e}");
                None
            }
        }
    }

    async fn lookup_jobseeker_name(&self, user: UserId) -> Option<String> {
        match queries::profiles::jobseeker_by_user(&*self.backend, user).await {
            Ok(profile) => profile.and_then(|p| p.display_name()),
            Err(e) => {
                debug!("Jobseeker profile join failed for {user}: {e}");
                None
            }
        }
    }
}
