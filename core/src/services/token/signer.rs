//! JWT signing primitive
//!
//! Access tokens are signed with the primary secret and refresh tokens with
//! the secondary secret (or the primary one when no secondary is configured).
//! `decode_unverified` skips signature and expiry checks and only
//! yields the expiry claim.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::entities::token::{AccessClaims, PartialClaims, RefreshClaims, TokenKind};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;

/// Keyed, tamper-evident signer for access and refresh tokens
pub struct JwtSigner {
    algorithm: Algorithm,
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    validation: Validation,
    unverified: Validation,
}

impl JwtSigner {
    /// Creates a signer from the service configuration
    ///
    /// # Returns
    ///
    /// * `Ok(JwtSigner)` - Keys loaded
    /// * `Err(TokenError::InvalidKeyConfig)` - Non-HMAC algorithm or empty secret
    pub fn new(config: &TokenServiceConfig) -> Result<Self, TokenError> {
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::InvalidKeyConfig {
                reason: format!("{:?} requires asymmetric keys, only HMAC secrets are supported", config.algorithm),
            });
        }
        if config.jwt_secret.is_empty() {
            return Err(TokenError::InvalidKeyConfig {
                reason: "primary secret is empty".to_string(),
            });
        }
        let refresh_secret = config.refresh_secret();
        if refresh_secret.is_empty() {
            return Err(TokenError::InvalidKeyConfig {
                reason: "refresh secret is empty".to_string(),
            });
        }

        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        let mut unverified = Validation::new(config.algorithm);
        unverified.insecure_disable_signature_validation();
        unverified.validate_exp = false;
        unverified.validate_aud = false;
        unverified.required_spec_claims.clear();

        Ok(Self {
            algorithm: config.algorithm,
            access_encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(refresh_secret.as_bytes()),
            validation,
            unverified,
        })
    }

    /// Signs access token claims with the primary secret
    pub fn sign_access(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        self.encode_jwt(claims, &self.access_encoding_key)
    }

    /// Signs refresh token claims with the secondary secret
    pub fn sign_refresh(&self, claims: &RefreshClaims) -> Result<String, TokenError> {
        self.encode_jwt(claims, &self.refresh_encoding_key)
    }

    /// Verifies signature, expiry and kind of an access token
    pub fn verify_access(&self, token: &str) -> Option<AccessClaims> {
        let claims: AccessClaims = self.decode_jwt(token, &self.access_decoding_key)?;
        (claims.kind == TokenKind::Access).then_some(claims)
    }

    /// Verifies signature, expiry and kind of a refresh token
    pub fn verify_refresh(&self, token: &str) -> Option<RefreshClaims> {
        let claims: RefreshClaims = self.decode_jwt(token, &self.refresh_decoding_key)?;
        (claims.kind == TokenKind::Refresh).then_some(claims)
    }

    /// Reads the expiry claim without checking the signature.
    ///
    /// Never use the result for an authorization decision.
    pub fn decode_unverified(&self, token: &str) -> Option<PartialClaims> {
        match decode::<PartialClaims>(token, &DecodingKey::from_secret(&[]), &self.unverified) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Unable to decode token payload: {:?}", e.kind());
                None
            }
        }
    }

    fn encode_jwt<C: Serialize>(&self, claims: &C, key: &EncodingKey) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, key).map_err(|e| TokenError::SigningFailed {
            reason: format!("{:?}", e.kind()),
        })
    }

    fn decode_jwt<C: DeserializeOwned>(&self, token: &str, key: &DecodingKey) -> Option<C> {
        match decode::<C>(token, key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Token verification failed: {:?}", e.kind());
                None
            }
        }
    }
}
