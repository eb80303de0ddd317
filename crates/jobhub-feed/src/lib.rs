//! # jobhub-feed
//!
//! The notification feed engine: merges realtime change events with
//! polled snapshots and persisted read-state into one per-`(user, role)`
//! feed with exactly-once unread accounting.
//!
//! Two independent producers converge on one persisted history:
//!
//! - the **poll path** (snapshot fetch + reconciliation) runs at mount and
//!   on a timer, and provides eventual correctness even when the change
//!   feed is down;
//! - the **realtime path** folds individual change events in immediately,
//!   deduplicated against the same history by notification identity.
//!
//! [`NotificationFeed`] owns both for one scope and exposes the API the
//! UI consumes.

pub mod alert;
pub mod normalizer;
pub mod realtime;
pub mod reconciler;
pub mod service;
pub mod snapshot;

pub use service::NotificationFeed;
