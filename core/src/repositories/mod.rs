//! Repository interfaces and in-memory implementations for token registries.

pub mod token;

pub use token::{
    BlacklistRepository, InMemoryBlacklistStore, InMemoryRefreshTokenStore, RefreshTokenRepository,
};
