//! Core building blocks for chartstamp
//!
//! - **config**: chartstamp.yaml parsing and validation
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: read-only git queries (system git oracle + memoizing cache)

pub mod config;
pub mod error;
pub mod vcs;
