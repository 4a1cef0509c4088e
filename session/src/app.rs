//! Process lifecycle: one token manager, one sweep, clean shutdown

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use sf_core::services::token::TokenManager;
use sf_shared::config::AppConfig;
use tracing::info;

/// Build the process-wide token manager.
///
/// Authentication middleware and the login/refresh/logout handlers share the
/// returned `Arc`.
pub fn build_manager(config: &AppConfig) -> anyhow::Result<Arc<TokenManager>> {
    let manager = TokenManager::from_app_config(config).context("failed to build token manager")?;
    Ok(Arc::new(manager))
}

/// Run the session service until `shutdown` resolves.
///
/// The sweep is started once here and stopped before returning. Registries
/// are memory-only, so every session ends with the process.
pub async fn run<F>(config: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    info!(environment = %config.environment, "Starting storefront session service");

    let manager = build_manager(&config)?;
    if manager.start_cleanup() {
        info!(
            interval_seconds = config.cleanup.interval_seconds,
            "Token sweep scheduled"
        );
    }

    shutdown.await;
    info!("Shutdown signal received");

    manager.stop_cleanup().await;

    let stats = manager.get_stats().await;
    info!(
        active_refresh_tokens = stats.active_refresh_tokens,
        blacklisted_tokens = stats.blacklisted_tokens,
        "Session registries discarded"
    );

    Ok(())
}
