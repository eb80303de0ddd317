//! Queries against the `jobs` table.

use jobhub_core::events::Table;
use jobhub_core::result::AppResult;
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::types::filter::{Filter, TableQuery};
use jobhub_core::types::id::{JobId, UserId};

use jobhub_entity::rows::JobRow;

use super::decode_rows;

/// A single job posting by primary key.
pub async fn by_id(backend: &dyn DataBackend, id: JobId) -> AppResult<Option<JobRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::Jobs)
                .filter(Filter::eq("id", serde_json::to_value(id)?))
                .limit(1),
        )
        .await?;
    Ok(decode_rows(rows)?.into_iter().next())
}

/// All job postings owned by an employer.
pub async fn for_employer(backend: &dyn DataBackend, employer: UserId) -> AppResult<Vec<JobRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::Jobs)
                .filter(Filter::eq("employer_id", serde_json::to_value(employer)?)),
        )
        .await?;
    decode_rows(rows)
}
