//! Notification feed configuration.

use serde::{Deserialize, Serialize};

/// Notification feed engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Interval between snapshot polls, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Maximum retained notifications per (user, role) history.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    /// Row cap applied to each snapshot sub-query.
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: u32,
    /// Whether to fire desktop-style alerts for new unread notifications.
    #[serde(default = "default_true")]
    pub alerts_enabled: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            history_cap: default_history_cap(),
            snapshot_limit: default_snapshot_limit(),
            alerts_enabled: true,
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_history_cap() -> usize {
    100
}

fn default_snapshot_limit() -> u32 {
    50
}

fn default_true() -> bool {
    true
}
