//! Domain-specific error types and error handling.

mod types;

pub use types::TokenError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_bridges_into_domain_error() {
        let err: DomainError = TokenError::MissingClaim {
            claim: "id".to_string(),
        }
        .into();

        assert!(matches!(err, DomainError::Token(TokenError::MissingClaim { .. })));
        assert_eq!(err.to_string(), "Missing claim: id");
    }

    #[test]
    fn test_signing_error_display() {
        let err = TokenError::SigningFailed {
            reason: "InvalidKeyFormat".to_string(),
        };
        assert_eq!(err.to_string(), "Token signing failed: InvalidKeyFormat");
    }
}
