//! Core constants shared across relay-panel crates.
//!
//! This crate provides:
//! - Default values for records, generated documents and panel settings
//! - Fixed block names referenced between generated documents
//! - Classification constants for logging

pub mod defaults;
pub mod errors;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use errors::*;

/// Project name.
pub const PROJECT_NAME: &str = "relay-panel";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
