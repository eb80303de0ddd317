//! Trait definitions for the seams the notification feed consumes.

pub mod alert;
pub mod backend;
pub mod kv;

pub use alert::AlertSink;
pub use backend::{DataBackend, Subscription};
pub use kv::KeyValueStore;
