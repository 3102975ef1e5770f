//! # hexapi Library
//!
//! Exposes the CLI definition and command functions for testing.
//!
//! The binary uses them through the `main.rs` entry point.

pub mod cli;

// Re-export the client crates for convenience
pub use hexapi_client;
pub use hexapi_core;
