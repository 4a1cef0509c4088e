//! Storefront session service
//!
//! Owns the process-wide `TokenManager` and the lifetime of its background
//! sweep. HTTP routes and middleware embed the manager returned by
//! [`app::build_manager`].

pub mod app;
pub mod telemetry;
