//! Strict SemVer 2 normalization for publishable versions
//!
//! Chart versions must be SemVer 2 before a chart can be published. A leading
//! `v` (common on git tags) is stripped; anything else either fails (strict)
//! or passes through with a warning, for charts that are rendered but never
//! published.

use crate::core::error::{StampError, StampResult, VersionError};

/// Normalize a version against strict SemVer 2.
///
/// Idempotent: feeding the output back in returns it unchanged.
pub fn fix(version: &str, strict: bool) -> StampResult<String> {
  if semver::Version::parse(version).is_ok() {
    return Ok(version.to_string());
  }

  if let Some(stripped) = version.strip_prefix('v')
    && semver::Version::parse(stripped).is_ok()
  {
    return Ok(stripped.to_string());
  }

  if strict {
    return Err(StampError::Version(VersionError::StrictFormat {
      version: version.to_string(),
    }));
  }

  println!("⚠️  Version '{}' is not SemVer 2; using it unchanged", version);
  Ok(version.to_string())
}
