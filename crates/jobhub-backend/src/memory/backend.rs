//! In-memory data backend: JSON rows per table plus a broadcast change feed.

use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;

use jobhub_core::error::AppError;
use jobhub_core::events::{ChangeEvent, ChangeKind, ChannelSpec, Table};
use jobhub_core::result::AppResult;
use jobhub_core::traits::backend::{DataBackend, Subscription};
use jobhub_core::types::filter::{Filter, SortOrder, TableQuery};

/// In-memory data backend.
///
/// Rows are stored as raw JSON values per table, matching what the wire
/// backend would return. Mutations publish [`ChangeEvent`]s on a broadcast
/// channel so subscriptions behave like the hosted change feed.
#[derive(Debug)]
pub struct MemoryBackend {
    /// Table name → rows.
    tables: DashMap<Table, Vec<Value>>,
    /// Change-feed sender. Receivers are created per subscription.
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryBackend {
    /// Create a new empty backend with the given change-feed buffer.
    pub fn new(buffer_size: usize) -> Self {
        let (events, _) = broadcast::channel(buffer_size);
        Self {
            tables: DashMap::new(),
            events,
        }
    }

    /// Load rows into a table without publishing change events.
    ///
    /// Used to establish pre-existing state before a feed attaches.
    pub fn seed<T: serde::Serialize>(&self, table: Table, rows: Vec<T>) -> AppResult<()> {
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            values.push(serde_json::to_value(row)?);
        }
        self.tables.entry(table).or_default().extend(values);
        Ok(())
    }

    /// Insert a row and publish an insert event.
    pub fn insert<T: serde::Serialize>(&self, table: Table, row: T) -> AppResult<()> {
        let value = serde_json::to_value(row)?;
        self.tables.entry(table).or_default().push(value.clone());
        self.publish(ChangeEvent {
            kind: ChangeKind::Insert,
            table,
            old: None,
            new: value,
        });
        Ok(())
    }

    /// Replace the row with the same `id` and publish an update event
    /// carrying the previous row state.
    pub fn update<T: serde::Serialize>(&self, table: Table, row: T) -> AppResult<()> {
        let value = serde_json::to_value(row)?;
        let id = value.get("id").cloned().ok_or_else(|| {
            AppError::validation(format!("Update row for '{table}' has no id field"))
        })?;

        let mut rows = self.tables.entry(table).or_default();
        let existing = rows
            .iter_mut()
            .find(|r| r.get("id") == Some(&id))
            .ok_or_else(|| AppError::not_found(format!("No row with id {id} in '{table}'")))?;

        let old = existing.clone();
        *existing = value.clone();
        drop(rows);

        self.publish(ChangeEvent {
            kind: ChangeKind::Update,
            table,
            old: Some(old),
            new: value,
        });
        Ok(())
    }

    /// Publish a raw change event.
    ///
    /// Exposed so tests can replay duplicate or out-of-order deliveries
    /// the way a flaky transport would.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.events.send(event);
    }

    fn matches(row: &Value, filter: &Filter) -> bool {
        match filter {
            Filter::Eq(column, value) => row.get(column) == Some(value),
            Filter::In(column, values) => row
                .get(column)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
        }
    }

    /// Total order over JSON scalars for sorting: null < number < string.
    fn compare(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::Number(_), _) => Ordering::Less,
            (_, Value::Number(_)) => Ordering::Greater,
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => Ordering::Equal,
        }
    }
}

#[async_trait]
impl DataBackend for MemoryBackend {
    async fn select(&self, query: TableQuery) -> AppResult<Vec<Value>> {
        let mut rows: Vec<Value> = self
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| Self::matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, order)) = &query.order_by {
            rows.sort_by(|a, b| {
                let cmp = Self::compare(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                match order {
                    SortOrder::Ascending => cmp,
                    SortOrder::Descending => cmp.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }

        Ok(rows)
    }

    async fn subscribe(&self, spec: ChannelSpec) -> AppResult<Subscription> {
        Ok(Subscription::new(spec, self.events.subscribe()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
