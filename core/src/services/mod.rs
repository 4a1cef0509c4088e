//! Business services containing domain logic and use cases.

pub mod token;

// Re-export commonly used types
pub use token::{
    CleanupHandle, CleanupResult, Clock, JwtSigner, ManualClock, SystemClock, TokenCleanupService,
    TokenIssuer, TokenManager, TokenServiceConfig, TokenStats,
};
