//! Token-related error types
//!
//! Only issuance can fail with an error. Verification failures never surface
//! here; they collapse into a negative result at the service boundary.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The signing primitive rejected the claims or key
    #[error("Token signing failed: {reason}")]
    SigningFailed { reason: String },

    /// Key material could not be loaded for the configured algorithm
    #[error("Invalid key configuration: {reason}")]
    InvalidKeyConfig { reason: String },

    #[error("Missing claim: {claim}")]
    MissingClaim { claim: String },
}
