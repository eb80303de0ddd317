//! Backend manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use jobhub_core::config::backend::BackendConfig;
use jobhub_core::error::AppError;
use jobhub_core::events::ChannelSpec;
use jobhub_core::result::AppResult;
use jobhub_core::traits::backend::{DataBackend, Subscription};
use jobhub_core::types::filter::TableQuery;

use crate::memory::MemoryBackend;

/// Backend manager that wraps the configured data backend provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct BackendManager {
    /// The inner backend provider.
    inner: Arc<dyn DataBackend>,
}

impl BackendManager {
    /// Create a new backend manager from configuration.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let inner: Arc<dyn DataBackend> = match config.provider.as_str() {
            "memory" => {
                info!("Initializing in-memory data backend");
                Arc::new(MemoryBackend::new(config.channel_buffer_size))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown backend provider: '{other}'. Supported: memory"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a backend manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn DataBackend>) -> Self {
        Self { inner: provider }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn DataBackend {
        self.inner.as_ref()
    }
}

#[async_trait]
impl DataBackend for BackendManager {
    async fn select(&self, query: TableQuery) -> AppResult<Vec<serde_json::Value>> {
        self.inner.select(query).await
    }

    async fn subscribe(&self, spec: ChannelSpec) -> AppResult<Subscription> {
        self.inner.subscribe(spec).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
