//! JobHub Feed Daemon
//!
//! Development entry point that wires the configured providers and runs
//! one notification feed scope, logging feed activity until shutdown.
//! The web client embeds the same engine through its own adapters.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use jobhub_backend::BackendManager;
use jobhub_core::config::AppConfig;
use jobhub_core::error::AppError;
use jobhub_core::traits::alert::AlertSink;
use jobhub_core::types::id::UserId;
use jobhub_entity::role::UserRole;
use jobhub_feed::NotificationFeed;
use jobhub_feed::alert::LogAlertSink;
use jobhub_store::StoreManager;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Feed daemon error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("JOBHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main daemon run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting JobHub feed daemon v{}", env!("CARGO_PKG_VERSION"));

    let user = match std::env::var("JOBHUB_USER") {
        Ok(raw) => Some(raw.parse::<UserId>().map_err(|e| {
            AppError::validation(format!("JOBHUB_USER is not a valid user id: {e}"))
        })?),
        Err(_) => None,
    };
    let role: UserRole = std::env::var("JOBHUB_ROLE")
        .unwrap_or_else(|_| "jobseeker".to_string())
        .parse()?;

    tracing::info!("Initializing backend (provider: {})...", config.backend.provider);
    let backend = Arc::new(BackendManager::new(&config.backend)?);

    tracing::info!("Initializing store (provider: {})...", config.store.provider);
    let store = Arc::new(StoreManager::new(&config.store)?);

    let alerts: Arc<dyn AlertSink> = Arc::new(LogAlertSink::new());

    let feed = NotificationFeed::spawn(backend, store, alerts, config.feed, user, role).await;
    tracing::info!(
        "Feed running for role '{}': {} notifications, {} unread",
        role,
        feed.notifications().len(),
        feed.unread_count()
    );

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping feed...");
    feed.shutdown();

    tracing::info!("JobHub feed daemon shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
