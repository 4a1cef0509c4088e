//! Background token sweep configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Configuration for the periodic sweep of expired refresh tokens and blacklist entries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Maximum number of entries removed per write-lock acquisition
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Whether to enable automatic cleanup
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            batch_size: default_batch_size(),
            enabled: default_enabled(),
        }
    }
}

impl CleanupConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            interval_seconds: env_or("TOKEN_CLEANUP_INTERVAL_SECONDS", default_interval_seconds()),
            batch_size: env_or("TOKEN_CLEANUP_BATCH_SIZE", default_batch_size()),
            enabled: env_or("TOKEN_CLEANUP_ENABLED", default_enabled()),
        }
    }

    /// Set the sweep interval
    pub fn with_interval_seconds(mut self, seconds: u64) -> Self {
        self.interval_seconds = seconds;
        self
    }
}

fn default_interval_seconds() -> u64 {
    300 // 5 minutes
}

fn default_batch_size() -> usize {
    500
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_config_default() {
        let config = CleanupConfig::default();
        assert_eq!(config.interval_seconds, 300);
        assert_eq!(config.batch_size, 500);
        assert!(config.enabled);
    }

    #[test]
    fn test_cleanup_config_partial_deserialize() {
        let config: CleanupConfig = serde_json::from_str(r#"{"enabled":false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.interval_seconds, 300);
    }
}
