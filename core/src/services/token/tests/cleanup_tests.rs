//! Tests for the background sweep lifecycle

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;

use sf_shared::config::CleanupConfig;

use crate::domain::entities::token::UserClaimsInput;
use crate::repositories::{InMemoryBlacklistStore, InMemoryRefreshTokenStore};
use crate::services::token::{ManualClock, TokenManager, TokenServiceConfig};

fn manager(cleanup: CleanupConfig) -> (TokenManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let manager = TokenManager::with_parts(
        TokenServiceConfig::new("cleanup-secret"),
        cleanup,
        Arc::new(InMemoryRefreshTokenStore::new()),
        Arc::new(InMemoryBlacklistStore::new()),
        clock.clone(),
    )
    .expect("Failed to create token manager");
    (manager, clock)
}

#[tokio::test(start_paused = true)]
async fn test_start_and_stop_cleanup() {
    let (manager, _) = manager(CleanupConfig::default());

    assert!(!manager.is_cleanup_running());
    assert!(manager.start_cleanup());
    assert!(manager.is_cleanup_running());

    // A second start while running is a no-op
    assert!(!manager.start_cleanup());

    manager.stop_cleanup().await;
    assert!(!manager.is_cleanup_running());

    // Stopping twice is harmless
    manager.stop_cleanup().await;

    // And the sweep can be restarted
    assert!(manager.start_cleanup());
    manager.stop_cleanup().await;
}

#[tokio::test(start_paused = true)]
async fn test_disabled_cleanup_does_not_start() {
    let config = CleanupConfig {
        enabled: false,
        ..CleanupConfig::default()
    };
    let (manager, _) = manager(config);

    assert!(!manager.start_cleanup());
    assert!(!manager.is_cleanup_running());
    manager.stop_cleanup().await;
}

#[tokio::test(start_paused = true)]
async fn test_background_sweep_runs_each_interval() {
    let (manager, clock) = manager(CleanupConfig::default().with_interval_seconds(300));
    let pair = manager
        .generate_tokens(&UserClaimsInput::new("u1"))
        .await
        .unwrap();

    clock.advance(Duration::days(8));
    assert!(manager.start_cleanup());

    // Nothing is swept before the first interval elapses
    tokio::time::sleep(StdDuration::from_secs(299)).await;
    assert_eq!(manager.get_stats().await.active_refresh_tokens, 1);

    tokio::time::sleep(StdDuration::from_secs(2)).await;
    assert_eq!(manager.get_stats().await.active_refresh_tokens, 0);
    assert!(manager.verify_refresh_token(&pair.refresh_token).await.is_none());

    manager.stop_cleanup().await;
}

#[tokio::test(start_paused = true)]
async fn test_stopped_sweep_no_longer_evicts() {
    let (manager, clock) = manager(CleanupConfig::default().with_interval_seconds(60));
    manager
        .generate_tokens(&UserClaimsInput::new("u1"))
        .await
        .unwrap();

    assert!(manager.start_cleanup());
    manager.stop_cleanup().await;

    clock.advance(Duration::days(8));
    tokio::time::sleep(StdDuration::from_secs(600)).await;

    assert_eq!(manager.get_stats().await.active_refresh_tokens, 1);
}

#[test]
fn test_start_outside_runtime_is_refused() {
    let (manager, _) = manager(CleanupConfig::default());

    assert!(!manager.start_cleanup());
    assert!(!manager.is_cleanup_running());
}

#[tokio::test]
async fn test_sweep_now_on_empty_registries() {
    let (manager, _) = manager(CleanupConfig::default());

    let result = manager.sweep_now().await;

    assert!(result.is_success());
    assert_eq!(result.total_cleaned(), 0);
}
