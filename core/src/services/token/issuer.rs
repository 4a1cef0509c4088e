//! Issuance of access/refresh token pairs

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use crate::domain::entities::token::{
    AccessClaims, RefreshClaims, RefreshTokenRecord, TokenPair, UserClaimsInput,
};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::RefreshTokenRepository;

use super::clock::Clock;
use super::signer::JwtSigner;

/// Creates signed token pairs and registers the refresh half
pub struct TokenIssuer<R: RefreshTokenRepository> {
    signer: Arc<JwtSigner>,
    refresh_tokens: Arc<R>,
    clock: Arc<dyn Clock>,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl<R: RefreshTokenRepository> TokenIssuer<R> {
    pub fn new(
        signer: Arc<JwtSigner>,
        refresh_tokens: Arc<R>,
        clock: Arc<dyn Clock>,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Self {
        Self {
            signer,
            refresh_tokens,
            clock,
            access_lifetime,
            refresh_lifetime,
        }
    }

    /// Generates a new token pair for a user
    ///
    /// The refresh token is registered with a record whose TTL is the fixed
    /// `REFRESH_RECORD_TTL_DAYS`, independent of `refresh_lifetime`.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The generated token pair
    /// * `Err(DomainError)` - Missing user id, or signing failed
    pub async fn generate_tokens(&self, user: &UserClaimsInput) -> DomainResult<TokenPair> {
        if user.id.is_empty() {
            return Err(TokenError::MissingClaim {
                claim: "userId".to_string(),
            }
            .into());
        }

        let now = self.clock.now();

        let access_claims = AccessClaims::new(user, now, self.access_lifetime);
        let access_token = self.signer.sign_access(&access_claims)?;

        let refresh_claims = RefreshClaims::new(&user.id, now, self.refresh_lifetime);
        let refresh_token = self.signer.sign_refresh(&refresh_claims)?;

        self.refresh_tokens
            .insert(refresh_token.clone(), RefreshTokenRecord::new(&user.id, now))
            .await?;

        debug!(
            user_id = %user.id,
            access_jti = %access_claims.jti,
            refresh_jti = %refresh_claims.jti,
            "Issued token pair"
        );

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.access_lifetime.num_seconds(),
            self.refresh_lifetime.num_seconds(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use crate::repositories::InMemoryRefreshTokenStore;
    use crate::services::token::clock::ManualClock;
    use crate::services::token::config::TokenServiceConfig;

    fn issuer(store: Arc<InMemoryRefreshTokenStore>, clock: Arc<ManualClock>) -> TokenIssuer<InMemoryRefreshTokenStore> {
        let config = TokenServiceConfig::new("issuer-secret");
        let signer = Arc::new(JwtSigner::new(&config).unwrap());
        TokenIssuer::new(
            signer,
            store,
            clock,
            config.access_token_lifetime(),
            config.refresh_token_lifetime(),
        )
    }

    #[tokio::test]
    async fn test_generate_tokens_registers_refresh_token() {
        let store = Arc::new(InMemoryRefreshTokenStore::new());
        let clock = Arc::new(ManualClock::starting_now());
        let issuer = issuer(Arc::clone(&store), Arc::clone(&clock));

        let pair = issuer.generate_tokens(&UserClaimsInput::new("u1")).await.unwrap();

        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.access_expires_in, 15 * 60);
        assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);

        let record = store.find(&pair.refresh_token).await.unwrap().unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.created_at, clock.now());
        assert_eq!(record.expires_at, clock.now() + Duration::days(7));
        assert!(store.find(&pair.access_token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generate_tokens_rejects_missing_id() {
        let store = Arc::new(InMemoryRefreshTokenStore::new());
        let issuer = issuer(Arc::clone(&store), Arc::new(ManualClock::starting_now()));

        let err = issuer.generate_tokens(&UserClaimsInput::default()).await.unwrap_err();

        assert!(matches!(err, DomainError::Token(TokenError::MissingClaim { .. })));
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
