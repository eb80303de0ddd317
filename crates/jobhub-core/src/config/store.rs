//! Persistent key-value store configuration.

use serde::{Deserialize, Serialize};

/// Persistent key-value store provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider: `"memory"` (additional providers are supplied by
    /// adapter crates).
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}
