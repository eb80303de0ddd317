//! Queries against the `notifications` table.

use jobhub_core::events::Table;
use jobhub_core::result::AppResult;
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::types::filter::{Filter, SortOrder, TableQuery};
use jobhub_core::types::id::UserId;

use jobhub_entity::rows::DirectNotificationRow;

use super::decode_rows;

/// Direct notifications addressed to a recipient, newest first.
pub async fn for_recipient(
    backend: &dyn DataBackend,
    recipient: UserId,
    limit: u32,
) -> AppResult<Vec<DirectNotificationRow>> {
    let rows = backend
        .select(
            TableQuery::new(Table::Notifications)
                .filter(Filter::eq("recipient_id", serde_json::to_value(recipient)?))
                .order_by("created_at", SortOrder::Descending)
                .limit(limit),
        )
        .await?;
    decode_rows(rows)
}
