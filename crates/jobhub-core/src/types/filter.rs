//! Query and filter types for the data backend's select interface.
//!
//! Queries are built with a small builder so call sites stay readable and
//! every consumed column name lives next to the table it belongs to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::Table;

/// A single row filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Filter {
    /// Column equals the given value.
    Eq(String, Value),
    /// Column value is one of the given values.
    In(String, Vec<Value>),
}

impl Filter {
    /// Build an equality filter.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    /// Build a membership filter.
    pub fn is_in(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In(column.into(), values)
    }
}

/// Sort direction for an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest / smallest first.
    Ascending,
    /// Newest / largest first.
    Descending,
}

/// A select query against one backend table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableQuery {
    /// The table to query.
    pub table: Table,
    /// Row filters, combined with AND.
    pub filters: Vec<Filter>,
    /// Optional ordering column and direction.
    pub order_by: Option<(String, SortOrder)>,
    /// Optional row cap.
    pub limit: Option<u32>,
}

impl TableQuery {
    /// Start a query against the given table.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Add a filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the ordering column and direction.
    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((column.into(), order));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
