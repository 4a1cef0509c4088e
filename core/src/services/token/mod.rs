//! Token service module for session/credential lifecycle management
//!
//! This module handles all token-related operations including:
//! - Access/refresh token issuance and verification
//! - The outstanding refresh token registry
//! - Proactive access token revocation (blacklist)
//! - Background cleanup of expired registry entries

mod cleanup;
mod clock;
mod config;
mod issuer;
mod manager;
mod signer;
mod stats;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupHandle, CleanupResult, TokenCleanupService};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use manager::TokenManager;
pub use signer::JwtSigner;
pub use stats::TokenStats;
