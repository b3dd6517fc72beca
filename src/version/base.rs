//! Base version validation and auto-increment shorthands
//!
//! A configured base version is the floor for every derived development
//! identifier until the next tagged release. It is always treated as a
//! prerelease: a bare `1.2.0` becomes `1.2.0-0.dev` so it sorts before a
//! future `1.2.0` release tag.

use crate::core::error::{StampError, StampResult, VersionError};
use crate::version::identifier::PRERELEASE_PREFIX;
use crate::version::parse_lenient;

/// Validate a configured base version against the latest tag, resolving the
/// `major` / `minor` / `patch` shorthands first.
///
/// The ordering check is skipped when `latest_tag_count == 0` (sitting exactly
/// on the tag: the base version will not be used). A latest tag that is not
/// SemVer 2 downgrades the check to a warning.
pub fn check_or_resolve(base_version: &str, latest_tag: Option<&str>, latest_tag_count: u64) -> StampResult<String> {
  let resolved = match base_version {
    "major" | "minor" | "patch" => auto_increment(base_version, latest_tag)?,
    concrete => normalize(concrete)?,
  };

  if latest_tag_count == 0 {
    return Ok(resolved);
  }

  let Some(tag) = latest_tag else {
    return Ok(resolved);
  };

  let Some(tag_version) = parse_lenient(tag) else {
    println!(
      "⚠️  Latest tag '{}' is not SemVer 2; skipping the base version ordering check",
      tag
    );
    return Ok(resolved);
  };

  // `resolved` came out of normalize/auto_increment, so it parses
  let base = semver::Version::parse(&resolved)
    .map_err(|e| StampError::message(format!("Resolved base version '{}' failed to parse: {}", resolved, e)))?;

  let base_triple = (base.major, base.minor, base.patch);
  let tag_triple = (tag_version.major, tag_version.minor, tag_version.patch);

  // Equal triples are fine only when the tag itself is a prerelease; relative
  // ordering between two prereleases of the same release is not adjudicated.
  let sorts_after = base_triple > tag_triple || (base_triple == tag_triple && !tag_version.pre.is_empty());

  if !sorts_after {
    return Err(StampError::Version(VersionError::NotGreater {
      base: resolved,
      tag: tag.to_string(),
    }));
  }

  Ok(resolved)
}

/// Resolve a shorthand into a concrete prerelease floor derived from the
/// latest tag: the named component is incremented, lower components zeroed.
fn auto_increment(shorthand: &str, latest_tag: Option<&str>) -> StampResult<String> {
  let tag = latest_tag.unwrap_or("");
  let Some(version) = latest_tag.and_then(parse_lenient) else {
    return Err(StampError::Version(VersionError::ShorthandTarget {
      shorthand: shorthand.to_string(),
      tag: tag.to_string(),
    }));
  };

  let (major, minor, patch) = match shorthand {
    "major" => (version.major + 1, 0, 0),
    "minor" => (version.major, version.minor + 1, 0),
    _ => (version.major, version.minor, version.patch + 1),
  };

  Ok(format!("{}.{}.{}-{}", major, minor, patch, PRERELEASE_PREFIX))
}

/// Validate a concrete base version, appending the `-0.dev` prerelease when
/// none is present.
fn normalize(base_version: &str) -> StampResult<String> {
  let parsed = semver::Version::parse(base_version).map_err(|e| {
    StampError::Version(VersionError::InvalidBase {
      base: base_version.to_string(),
      reason: e.to_string(),
    })
  })?;

  if !parsed.build.is_empty() {
    return Err(StampError::Version(VersionError::InvalidBase {
      base: base_version.to_string(),
      reason: "build metadata (+) is not allowed in a base version".to_string(),
    }));
  }

  if parsed.pre.is_empty() {
    return Ok(format!("{}-{}", base_version, PRERELEASE_PREFIX));
  }

  Ok(base_version.to_string())
}
