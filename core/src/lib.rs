//! # Storefront Session Core
//!
//! Session/credential lifecycle management for the storefront backend:
//! issuance of short-lived access tokens and longer-lived refresh tokens,
//! the registry of outstanding refresh tokens, proactive revocation of
//! access tokens, and a background sweep that bounds the memory of both
//! registries. State is memory-only and lost on restart.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
