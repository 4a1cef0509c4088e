//! Domain layer containing token entities and registry records.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
