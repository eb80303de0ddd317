//! Shared type definitions: typed identifiers and query/filter types.

pub mod filter;
pub mod id;

pub use filter::{Filter, SortOrder, TableQuery};
pub use id::{NotificationId, SourceKind, UserId};
