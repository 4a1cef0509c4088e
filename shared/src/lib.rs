//! Shared configuration types for the storefront session services
//!
//! This crate provides the configuration used across all server modules:
//! token signing secrets and lifetimes, the background sweep schedule,
//! environment detection and logging options.

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CleanupConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
};
