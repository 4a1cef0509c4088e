//! Token cleanup service for periodic eviction of expired registry entries
//!
//! Lazy eviction only removes entries that somebody looks up again. This
//! sweep bounds memory for tokens nobody re-checks after they expire.

use std::sync::Arc;
use std::time::Duration;

use sf_shared::config::CleanupConfig;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::{BlacklistRepository, RefreshTokenRepository};

use super::clock::Clock;

/// Service for cleaning up expired refresh tokens and blacklist entries
pub struct TokenCleanupService<R, B>
where
    R: RefreshTokenRepository + 'static,
    B: BlacklistRepository + 'static,
{
    refresh_tokens: Arc<R>,
    blacklist: Arc<B>,
    clock: Arc<dyn Clock>,
    config: CleanupConfig,
}

impl<R, B> TokenCleanupService<R, B>
where
    R: RefreshTokenRepository + 'static,
    B: BlacklistRepository + 'static,
{
    /// Create a new token cleanup service
    pub fn new(
        refresh_tokens: Arc<R>,
        blacklist: Arc<B>,
        clock: Arc<dyn Clock>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            refresh_tokens,
            blacklist,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Run a single cleanup cycle
    ///
    /// Deletes expired refresh token records first, then expired blacklist
    /// entries. A failure in one step is recorded and does not skip the other.
    pub async fn run_cleanup(&self) -> CleanupResult {
        let mut result = CleanupResult::default();

        match self.cleanup_expired_tokens().await {
            Ok(count) => result.expired_refresh_tokens_deleted = count,
            Err(e) => {
                error!("Failed to cleanup expired refresh tokens: {}", e);
                result.errors.push(format!("Refresh token cleanup error: {}", e));
            }
        }

        match self.cleanup_blacklist().await {
            Ok(count) => result.blacklist_entries_deleted = count,
            Err(e) => {
                error!("Failed to cleanup blacklist: {}", e);
                result.errors.push(format!("Blacklist cleanup error: {}", e));
            }
        }

        info!(
            "Token cleanup completed - Refresh tokens: {}, Blacklist: {}",
            result.expired_refresh_tokens_deleted, result.blacklist_entries_deleted
        );

        result
    }

    async fn cleanup_expired_tokens(&self) -> Result<usize, DomainError> {
        self.refresh_tokens
            .delete_expired(self.clock.now(), self.config.batch_size)
            .await
    }

    async fn cleanup_blacklist(&self) -> Result<usize, DomainError> {
        self.blacklist
            .delete_expired(self.clock.now(), self.config.batch_size)
            .await
    }

    /// Start the cleanup service as a background task
    ///
    /// The first sweep runs one full interval after start. Returns `None` when
    /// cleanup is disabled or no tokio runtime is available.
    pub fn start_background_task(self: Arc<Self>) -> Option<CleanupHandle> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("Token cleanup not started: no tokio runtime on this thread");
            return None;
        };

        let period = Duration::from_secs(self.config.interval_seconds.max(1));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = runtime.spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                period.as_secs()
            );

            let mut interval_timer = tokio::time::interval(period);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval_timer.tick().await;

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let result = self.run_cleanup().await;
                        if !result.is_success() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Token cleanup service stopped");
        });

        Some(CleanupHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        })
    }
}

/// Cancellation handle for the background sweep.
///
/// Dropping the handle without calling [`CleanupHandle::stop`] aborts the task.
pub struct CleanupHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl CleanupHandle {
    /// Signal the sweep to stop and wait for it to finish
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Token cleanup task ended abnormally: {}", e);
                }
            }
        }
    }

    /// Whether the background task is still alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired refresh token records deleted
    pub expired_refresh_tokens_deleted: usize,
    /// Number of expired blacklist entries deleted
    pub blacklist_entries_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.expired_refresh_tokens_deleted + self.blacklist_entries_deleted
    }
}
