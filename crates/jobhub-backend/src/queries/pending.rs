//! Queries against the `jobvacancypending` table.

use jobhub_core::events::Table;
use jobhub_core::result::AppResult;
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::types::filter::{Filter, SortOrder, TableQuery};

use jobhub_entity::rows::{PendingJobRow, PendingJobStatus};

use super::decode_rows;

/// Pending job vacancies with the given review status, newest first.
pub async fn with_status(
    backend: &dyn DataBackend,
    status: PendingJobStatus,
    limit: u32,
) -> AppResult<Vec<PendingJobRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::Jobvacancypending)
                .filter(Filter::eq("status", serde_json::to_value(status)?))
                .order_by("created_at", SortOrder::Descending)
                .limit(limit),
        )
        .await?;
    decode_rows(rows)
}
