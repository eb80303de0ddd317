//! Data backend configuration.

use serde::{Deserialize, Serialize};

/// Data backend provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend provider: `"memory"` (additional providers are supplied by
    /// adapter crates).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Buffer size for the change-feed broadcast channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_channel_buffer() -> usize {
    256
}
