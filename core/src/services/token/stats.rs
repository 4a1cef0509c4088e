//! Read-only aggregate view of the token registries

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of registry sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    /// Refresh tokens currently registered
    pub active_refresh_tokens: usize,
    /// Access tokens currently blacklisted
    pub blacklisted_tokens: usize,
    /// The time the stats were taken, not the time of the last sweep
    pub last_cleanup: DateTime<Utc>,
}
