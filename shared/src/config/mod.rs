//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing secrets and lifetimes
//! - `cleanup` - Background sweep of expired tokens
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod cleanup;
pub mod environment;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use auth::{AuthConfig, JwtConfig};
pub use cleanup::CleanupConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Token sweep configuration
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            auth: AuthConfig::default(),
            cleanup: CleanupConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        Self {
            environment: env,
            auth: AuthConfig::from_env(),
            cleanup: CleanupConfig::from_env(),
            logging: LoggingConfig::for_environment(env).with_env_override(),
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or unparsable.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
