//! Repository traits for the refresh token registry and the access token blacklist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::{BlacklistRecord, RefreshTokenRecord};
use crate::errors::DomainError;

/// Registry of outstanding refresh tokens, keyed by the exact signed token string.
///
/// A record is present if and only if the token is still honoured: it has not
/// been invalidated and has not been evicted as expired. Records are never
/// mutated in place, only inserted or removed.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Register a freshly issued refresh token
    ///
    /// # Arguments
    /// * `token` - The signed refresh token string
    /// * `record` - Ownership and expiry metadata
    async fn insert(&self, token: String, record: RefreshTokenRecord) -> Result<(), DomainError>;

    /// Look up the record for a token
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Token is registered
    /// * `Ok(None)` - Never issued, invalidated or already evicted
    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Remove a token unconditionally
    ///
    /// # Returns
    /// * `Ok(true)` - A record was removed
    /// * `Ok(false)` - Nothing was registered under that token
    async fn remove(&self, token: &str) -> Result<bool, DomainError>;

    /// Remove a token only if its record is expired at `now`
    async fn remove_if_expired(&self, token: &str, now: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Delete every record expired at `now`
    ///
    /// At most `batch_size` records are removed per write-lock acquisition so
    /// concurrent lookups are not starved during a sweep.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: usize) -> Result<usize, DomainError>;

    /// Number of registered tokens
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Registry of access tokens revoked before their natural expiry.
///
/// Presence means "revoked". Once the token's own expiry has passed an entry
/// carries no information and may be evicted.
#[async_trait]
pub trait BlacklistRepository: Send + Sync {
    /// Record a revoked access token
    async fn insert(&self, token: String, record: BlacklistRecord) -> Result<(), DomainError>;

    /// Look up the entry for a token
    async fn find(&self, token: &str) -> Result<Option<BlacklistRecord>, DomainError>;

    /// Remove a token only if its entry is expired at `now`
    async fn remove_if_expired(&self, token: &str, now: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Delete every entry expired at `now`, in chunks of `batch_size`
    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: usize) -> Result<usize, DomainError>;

    /// Number of blacklisted tokens
    async fn count(&self) -> Result<usize, DomainError>;
}
