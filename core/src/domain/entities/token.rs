//! Token entities for JWT-based session management.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token lifetime (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Default refresh token lifetime (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Lifetime of a refresh token's registry record.
///
/// Fixed at 7 days regardless of the configured refresh token lifetime, so
/// the two drift apart if that lifetime is reconfigured.
pub const REFRESH_RECORD_TTL_DAYS: i64 = 7;

/// Upper bound for any configured token lifetime
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 365;

/// Discriminates access tokens from refresh tokens inside the claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// The subset of a user needed to issue tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserClaimsInput {
    /// User identifier, required
    pub id: String,
    /// Role embedded verbatim into the access token
    pub role: Option<String>,
    /// Email embedded verbatim into the access token
    pub email: Option<String>,
}

impl UserClaimsInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
            email: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userId")]
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Always `TokenKind::Access`
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// JWT ID, for audit correlation only
    pub jti: String,

    /// Issued at timestamp (seconds)
    pub iat: i64,

    /// Expiration timestamp (seconds)
    pub exp: i64,
}

impl AccessClaims {
    /// Creates new claims for an access token issued at `now`
    pub fn new(user: &UserClaimsInput, now: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role.clone(),
            email: user.email.clone(),
            kind: TokenKind::Access,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiry_timestamp(now, lifetime),
        }
    }
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Always `TokenKind::Refresh`
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// JWT ID, for audit correlation only
    pub jti: String,

    /// Issued at timestamp (seconds)
    pub iat: i64,

    /// Expiration timestamp (seconds)
    pub exp: i64,
}

impl RefreshClaims {
    /// Creates new claims for a refresh token issued at `now`
    pub fn new(user_id: &str, now: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: TokenKind::Refresh,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiry_timestamp(now, lifetime),
        }
    }
}

/// `now + lifetime` in seconds, saturating at the latest representable instant
fn expiry_timestamp(now: DateTime<Utc>, lifetime: Duration) -> i64 {
    now.checked_add_signed(lifetime)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .timestamp()
}

/// Claims read from a token without checking its signature.
///
/// Only the expiry is exposed; nothing here may feed an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PartialClaims {
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Registry entry for an outstanding refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// User this token belongs to
    pub user_id: String,

    /// When the record stops being honoured
    pub expires_at: DateTime<Utc>,

    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a record issued at `now` with the fixed record TTL
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            expires_at: now + Duration::days(REFRESH_RECORD_TTL_DAYS),
            created_at: now,
        }
    }

    /// `true` once `expires_at` lies strictly before `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Registry entry for a proactively revoked access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistRecord {
    /// The revoked token's own expiry
    pub expires_at: DateTime<Utc>,
}

impl BlacklistRecord {
    /// Builds a record from an `exp` claim in seconds.
    ///
    /// Returns `None` if the claim does not map to a representable instant.
    pub fn from_exp(exp: i64) -> Option<Self> {
        let millis = exp.checked_mul(1000)?;
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(|expires_at| Self { expires_at })
    }

    /// `true` once `now` has passed the token's expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}
