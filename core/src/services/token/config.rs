//! Configuration for the token service

use chrono::Duration;
use jsonwebtoken::Algorithm;
use sf_shared::config::JwtConfig;

use crate::domain::entities::token::{
    ACCESS_TOKEN_EXPIRY_MINUTES, MAX_TOKEN_LIFETIME_DAYS, REFRESH_TOKEN_EXPIRY_DAYS,
};
use crate::errors::TokenError;

const MAX_LIFETIME_SECONDS: i64 = MAX_TOKEN_LIFETIME_DAYS * 24 * 60 * 60;

/// Configuration for the token service
///
/// Lifetimes are read once when the service is built.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Primary signing secret, used for access tokens
    pub jwt_secret: String,
    /// Secondary signing secret for refresh tokens
    pub refresh_secret: Option<String>,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Access token expiry in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token expiry in seconds
    pub refresh_token_expiry_seconds: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            refresh_secret: None,
            algorithm: Algorithm::HS256,
            access_token_expiry_seconds: ACCESS_TOKEN_EXPIRY_MINUTES * 60,
            refresh_token_expiry_seconds: REFRESH_TOKEN_EXPIRY_DAYS * 24 * 60 * 60,
        }
    }
}

impl TokenServiceConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    pub fn with_refresh_secret(mut self, secret: impl Into<String>) -> Self {
        self.refresh_secret = Some(secret.into());
        self
    }

    /// Secret used for refresh tokens, falling back to the primary secret
    pub fn refresh_secret(&self) -> &str {
        self.refresh_secret.as_deref().unwrap_or(&self.jwt_secret)
    }

    /// Checks that both lifetimes lie in `1..=MAX_TOKEN_LIFETIME_DAYS` days
    pub fn validate(&self) -> Result<(), TokenError> {
        check_lifetime("access token", self.access_token_expiry_seconds)?;
        check_lifetime("refresh token", self.refresh_token_expiry_seconds)
    }

    pub fn access_token_lifetime(&self) -> Duration {
        bounded_lifetime(self.access_token_expiry_seconds)
    }

    pub fn refresh_token_lifetime(&self) -> Duration {
        bounded_lifetime(self.refresh_token_expiry_seconds)
    }
}

fn check_lifetime(name: &str, seconds: i64) -> Result<(), TokenError> {
    if (1..=MAX_LIFETIME_SECONDS).contains(&seconds) {
        return Ok(());
    }
    Err(TokenError::InvalidKeyConfig {
        reason: format!(
            "{} lifetime of {}s is outside 1s..={} days",
            name, seconds, MAX_TOKEN_LIFETIME_DAYS
        ),
    })
}

// Unvalidated values are clamped rather than overflowing `Duration`
fn bounded_lifetime(seconds: i64) -> Duration {
    Duration::seconds(seconds.clamp(0, MAX_LIFETIME_SECONDS))
}

impl TryFrom<&JwtConfig> for TokenServiceConfig {
    type Error = TokenError;

    fn try_from(jwt: &JwtConfig) -> Result<Self, Self::Error> {
        let algorithm = jwt
            .algorithm
            .parse::<Algorithm>()
            .map_err(|e| TokenError::InvalidKeyConfig {
                reason: format!("unknown algorithm {}: {}", jwt.algorithm, e),
            })?;

        let config = Self {
            jwt_secret: jwt.secret.clone(),
            refresh_secret: jwt.refresh_secret.clone(),
            algorithm,
            access_token_expiry_seconds: jwt.access_token_expiry,
            refresh_token_expiry_seconds: jwt.refresh_token_expiry,
        };
        config.validate()?;
        Ok(config)
    }
}
