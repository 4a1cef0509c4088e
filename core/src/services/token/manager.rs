//! Session/credential lifecycle facade
//!
//! One `TokenManager` is built at process start and shared (behind an `Arc`)
//! by the authentication middleware and the login/refresh/logout handlers.
//! Every steady-state operation collapses failures into a negative result.

use std::sync::{Arc, Mutex, PoisonError};

use sf_shared::config::{AppConfig, CleanupConfig};
use tracing::{debug, info, warn};

use crate::domain::entities::token::{
    AccessClaims, BlacklistRecord, RefreshClaims, TokenPair, UserClaimsInput,
};
use crate::errors::DomainResult;
use crate::repositories::{
    BlacklistRepository, InMemoryBlacklistStore, InMemoryRefreshTokenStore, RefreshTokenRepository,
};

use super::cleanup::{CleanupHandle, CleanupResult, TokenCleanupService};
use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::signer::JwtSigner;
use super::stats::TokenStats;

/// Facade over token issuance, the refresh registry, the blacklist and the sweep
pub struct TokenManager<R = InMemoryRefreshTokenStore, B = InMemoryBlacklistStore>
where
    R: RefreshTokenRepository + 'static,
    B: BlacklistRepository + 'static,
{
    signer: Arc<JwtSigner>,
    issuer: TokenIssuer<R>,
    refresh_tokens: Arc<R>,
    blacklist: Arc<B>,
    clock: Arc<dyn Clock>,
    cleanup: Arc<TokenCleanupService<R, B>>,
    cleanup_handle: Mutex<Option<CleanupHandle>>,
}

impl TokenManager {
    /// Creates a manager backed by in-memory stores and the system clock
    pub fn new(config: TokenServiceConfig, cleanup_config: CleanupConfig) -> DomainResult<Self> {
        Self::with_parts(
            config,
            cleanup_config,
            Arc::new(InMemoryRefreshTokenStore::new()),
            Arc::new(InMemoryBlacklistStore::new()),
            Arc::new(SystemClock),
        )
    }

    /// Creates a manager from the application configuration
    pub fn from_app_config(config: &AppConfig) -> DomainResult<Self> {
        if config.auth.jwt.is_using_default_secret() {
            warn!("JWT_SECRET is not set, signing with the development default");
        }
        let token_config = TokenServiceConfig::try_from(&config.auth.jwt)?;
        Self::new(token_config, config.cleanup.clone())
    }
}

impl<R, B> TokenManager<R, B>
where
    R: RefreshTokenRepository + 'static,
    B: BlacklistRepository + 'static,
{
    /// Creates a manager over explicit stores and clock
    ///
    /// # Returns
    ///
    /// * `Ok(TokenManager)` - Ready to issue tokens; the sweep is not started
    /// * `Err(DomainError)` - Signing keys or lifetimes are misconfigured
    pub fn with_parts(
        config: TokenServiceConfig,
        cleanup_config: CleanupConfig,
        refresh_tokens: Arc<R>,
        blacklist: Arc<B>,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        config.validate()?;
        let signer = Arc::new(JwtSigner::new(&config)?);

        let issuer = TokenIssuer::new(
            Arc::clone(&signer),
            Arc::clone(&refresh_tokens),
            Arc::clone(&clock),
            config.access_token_lifetime(),
            config.refresh_token_lifetime(),
        );

        let cleanup = Arc::new(TokenCleanupService::new(
            Arc::clone(&refresh_tokens),
            Arc::clone(&blacklist),
            Arc::clone(&clock),
            cleanup_config,
        ));

        Ok(Self {
            signer,
            issuer,
            refresh_tokens,
            blacklist,
            clock,
            cleanup,
            cleanup_handle: Mutex::new(None),
        })
    }

    /// Issues an access/refresh pair and registers the refresh token
    pub async fn generate_tokens(&self, user: &UserClaimsInput) -> DomainResult<TokenPair> {
        self.issuer.generate_tokens(user).await
    }

    /// Verifies a refresh token
    ///
    /// Bad signature, expired claims, never issued, invalidated and swept all
    /// yield `None`. Verification does not consume the token.
    pub async fn verify_refresh_token(&self, token: &str) -> Option<RefreshClaims> {
        let claims = self.signer.verify_refresh(token)?;

        let record = match self.refresh_tokens.find(token).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(jti = %claims.jti, "Refresh token is not registered");
                return None;
            }
            Err(e) => {
                warn!("Refresh token lookup failed: {}", e);
                return None;
            }
        };

        let now = self.clock.now();
        if record.is_expired_at(now) {
            if let Err(e) = self.refresh_tokens.remove_if_expired(token, now).await {
                warn!("Failed to evict expired refresh token: {}", e);
            }
            debug!(jti = %claims.jti, user_id = %record.user_id, "Evicted expired refresh token");
            return None;
        }

        Some(claims)
    }

    /// Removes a refresh token from the registry. Idempotent.
    pub async fn invalidate_refresh_token(&self, token: &str) {
        match self.refresh_tokens.remove(token).await {
            Ok(true) => debug!("Refresh token invalidated"),
            Ok(false) => {}
            Err(e) => warn!("Failed to invalidate refresh token: {}", e),
        }
    }

    /// Revokes an access token until its own expiry.
    ///
    /// The signature is not checked; only the `exp` claim is read. Tokens
    /// without a readable expiry are ignored silently.
    pub async fn blacklist_token(&self, access_token: &str) {
        let Some(exp) = self
            .signer
            .decode_unverified(access_token)
            .and_then(|claims| claims.exp)
        else {
            debug!("Ignoring blacklist request for token without readable expiry");
            return;
        };

        let Some(record) = BlacklistRecord::from_exp(exp) else {
            debug!(exp, "Ignoring blacklist request with out-of-range expiry");
            return;
        };

        if let Err(e) = self.blacklist.insert(access_token.to_string(), record).await {
            warn!("Failed to blacklist access token: {}", e);
        }
    }

    /// Whether an access token has been revoked and has not yet expired
    pub async fn is_token_blacklisted(&self, access_token: &str) -> bool {
        let record = match self.blacklist.find(access_token).await {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                warn!("Blacklist lookup failed: {}", e);
                return false;
            }
        };

        let now = self.clock.now();
        if record.is_expired_at(now) {
            if let Err(e) = self.blacklist.remove_if_expired(access_token, now).await {
                warn!("Failed to evict expired blacklist entry: {}", e);
            }
            return false;
        }

        true
    }

    /// Verifies an access token and rejects it if blacklisted
    pub async fn verify_access_token(&self, token: &str) -> Option<AccessClaims> {
        let claims = self.signer.verify_access(token)?;
        if self.is_token_blacklisted(token).await {
            debug!(jti = %claims.jti, "Rejected blacklisted access token");
            return None;
        }
        Some(claims)
    }

    /// Current registry sizes. `last_cleanup` is the call time.
    pub async fn get_stats(&self) -> TokenStats {
        let active_refresh_tokens = self.refresh_tokens.count().await.unwrap_or_else(|e| {
            warn!("Failed to count refresh tokens: {}", e);
            0
        });
        let blacklisted_tokens = self.blacklist.count().await.unwrap_or_else(|e| {
            warn!("Failed to count blacklisted tokens: {}", e);
            0
        });

        TokenStats {
            active_refresh_tokens,
            blacklisted_tokens,
            last_cleanup: self.clock.now(),
        }
    }

    /// Runs one sweep immediately
    pub async fn sweep_now(&self) -> CleanupResult {
        self.cleanup.run_cleanup().await
    }

    /// Starts the periodic sweep.
    ///
    /// Returns `true` if a new sweep task was spawned. A second call while the
    /// sweep is running does nothing, as does a call from outside a tokio
    /// runtime.
    pub fn start_cleanup(&self) -> bool {
        let mut slot = self
            .cleanup_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if slot.as_ref().is_some_and(CleanupHandle::is_running) {
            warn!("Token cleanup is already running");
            return false;
        }

        *slot = Arc::clone(&self.cleanup).start_background_task();
        slot.is_some()
    }

    /// Stops the periodic sweep and waits for it to exit. Idempotent.
    pub async fn stop_cleanup(&self) {
        let handle = self
            .cleanup_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.stop().await;
            info!("Token cleanup stopped");
        }
    }

    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(CleanupHandle::is_running)
    }
}
