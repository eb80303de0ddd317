//! Queries against the `applications` table.

use serde_json::Value;

use jobhub_core::events::Table;
use jobhub_core::result::AppResult;
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::types::filter::{Filter, SortOrder, TableQuery};
use jobhub_core::types::id::{ApplicationId, JobId, UserId};

use jobhub_entity::rows::{ApplicationRow, ApplicationStatus};

use super::decode_rows;

/// A jobseeker's own applications, most recent first.
pub async fn for_jobseeker(
    backend: &dyn DataBackend,
    jobseeker: UserId,
    limit: u32,
) -> AppResult<Vec<ApplicationRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::Applications)
                .filter(Filter::eq("jobseeker_id", serde_json::to_value(jobseeker)?))
                .order_by("applied_at", SortOrder::Descending)
                .limit(limit),
        )
        .await?;
    decode_rows(rows)
}

/// Applications against any of the given jobs, restricted to the given
/// statuses, most recently updated first.
pub async fn for_jobs_with_status(
    backend: &dyn DataBackend,
    jobs: &[JobId],
    statuses: &[ApplicationStatus],
    limit: u32,
) -> AppResult<Vec<ApplicationRow>> {
    if jobs.is_empty() {
        return Ok(Vec::new());
    }

    let job_values: Vec<Value> = jobs
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;
    let status_values: Vec<Value> = statuses
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    let rows = backend
        .select(
            TableQuery::new(Table::Applications)
                .filter(Filter::is_in("job_id", job_values))
                .filter(Filter::is_in("status", status_values))
                .order_by("updated_at", SortOrder::Descending)
                .limit(limit),
        )
        .await?;
    decode_rows(rows)
}

/// A single application by primary key.
pub async fn by_id(
    backend: &dyn DataBackend,
    id: ApplicationId,
) -> AppResult<Option<ApplicationRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::Applications)
                .filter(Filter::eq("id", serde_json::to_value(id)?))
                .limit(1),
        )
        .await?;
    Ok(decode_rows(rows)?.into_iter().next())
}
