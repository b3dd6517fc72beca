//! Version derivation from git history
//!
//! This module turns git facts (tags, commit counts, hashes) into SemVer 2
//! identifiers for charts and images:
//!
//! - **identifier**: the derivation engine and the build-suffix grammar
//! - **base**: base-version validation and auto-increment shorthands
//! - **fixer**: strict SemVer 2 normalization for publishable versions

pub mod base;
pub mod fixer;
pub mod identifier;

pub use identifier::{DeriveOptions, derive, format_identifier, strip_build_suffix};

/// Parse a version leniently: accept strict SemVer 2, with at most one
/// leading `v` stripped. Tags in the wild often carry the prefix.
pub fn parse_lenient(version: &str) -> Option<semver::Version> {
  if let Ok(v) = semver::Version::parse(version) {
    return Some(v);
  }
  version
    .strip_prefix('v')
    .and_then(|stripped| semver::Version::parse(stripped).ok())
}
