//! Data backend trait for pluggable query and change-feed providers.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::events::{ChangeEvent, ChannelSpec};
use crate::result::AppResult;
use crate::types::filter::TableQuery;

/// Trait for data backends (the production BaaS adapter or the in-memory
/// backend used by tests and the dev daemon).
///
/// Rows cross this boundary as raw JSON values; typed decoding belongs to
/// the query layer, which knows which table it asked for.
#[async_trait]
pub trait DataBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Run a select query and return the matching rows.
    async fn select(&self, query: TableQuery) -> AppResult<Vec<serde_json::Value>>;

    /// Open a change-feed subscription for the tables named by the spec.
    async fn subscribe(&self, spec: ChannelSpec) -> AppResult<Subscription>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// A live change-feed subscription.
///
/// The subscription is owned by the scope that opened it; dropping it
/// releases the channel. Events for tables outside the spec are filtered
/// out before they reach the caller.
#[derive(Debug)]
pub struct Subscription {
    /// Tables this subscription observes.
    spec: ChannelSpec,
    /// The underlying broadcast receiver.
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Wrap a broadcast receiver with a table filter.
    pub fn new(spec: ChannelSpec, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { spec, receiver }
    }

    /// Receive the next matching event.
    ///
    /// Returns `None` once the channel is closed. A lagged receiver skips
    /// the missed events and keeps going; the poll path backfills whatever
    /// the lag dropped.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.spec.matches(event.table) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Change-feed subscription lagged, skipped {missed} events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
