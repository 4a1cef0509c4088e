//! Domain entities representing core business objects.

pub mod token;

// Re-export commonly used types
pub use token::{
    AccessClaims, BlacklistRecord, PartialClaims, RefreshClaims, RefreshTokenRecord, TokenKind,
    TokenPair, UserClaimsInput, ACCESS_TOKEN_EXPIRY_MINUTES, MAX_TOKEN_LIFETIME_DAYS,
    REFRESH_RECORD_TTL_DAYS, REFRESH_TOKEN_EXPIRY_DAYS,
};
