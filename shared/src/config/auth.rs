//! Token signing configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Primary secret, signs access tokens
    pub secret: String,

    /// Secondary secret for refresh tokens; falls back to `secret` when unset
    #[serde(default)]
    pub refresh_secret: Option<String>,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            refresh_secret: None,
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set a dedicated refresh token secret
    pub fn with_refresh_secret(mut self, secret: impl Into<String>) -> Self {
        self.refresh_secret = Some(secret.into());
        self
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            jwt: JwtConfig {
                secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
                refresh_secret,
                access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
                refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
                algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            },
        }
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_refresh_secret_is_optional() {
        let config = JwtConfig::new("primary");
        assert_eq!(config.refresh_secret, None);

        let config = config.with_refresh_secret("secondary");
        assert_eq!(config.refresh_secret.as_deref(), Some("secondary"));
    }

    #[test]
    fn test_auth_config_deserializes_without_refresh_secret() {
        let json = r#"{"jwt":{"secret":"s","access_token_expiry":60,"refresh_token_expiry":120}}"#;
        let config: AuthConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.jwt.refresh_secret, None);
        assert_eq!(config.jwt.algorithm, "HS256");
    }
}
