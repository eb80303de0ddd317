//! # jobhub-entity
//!
//! Domain entity models for JobHub: row types for the consumed backend
//! tables, the viewing-role enum, the tagged source-record union, and the
//! feed notification entity.

pub mod notification;
pub mod record;
pub mod role;
pub mod rows;

pub use notification::{Notification, NotificationKind};
pub use record::{ApplicationRecord, PendingJobRecord, SourceRecord};
pub use role::UserRole;
