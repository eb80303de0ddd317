//! Queries against the profile tables.

use jobhub_core::events::Table;
use jobhub_core::result::AppResult;
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::types::filter::{Filter, TableQuery};
use jobhub_core::types::id::UserId;

use jobhub_entity::rows::{EmployerProfileRow, JobseekerProfileRow};

use super::decode_rows;

/// The employer profile owned by a user.
pub async fn employer_by_user(
    backend: &dyn DataBackend,
    user: UserId,
) -> AppResult<Option<EmployerProfileRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::EmployerProfiles)
                .filter(Filter::eq("user_id", serde_json::to_value(user)?))
                .limit(1),
        )
        .await?;
    Ok(decode_rows(rows)?.into_iter().next())
}

/// The jobseeker profile owned by a user.
pub async fn jobseeker_by_user(
    backend: &dyn DataBackend,
    user: UserId,
) -> AppResult<Option<JobseekerProfileRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::JobseekerProfiles)
                .filter(Filter::eq("user_id", serde_json::to_value(user)?))
                .limit(1),
        )
        .await?;
    Ok(decode_rows(rows)?.into_iter().next())
}
