//! The version identifier engine
//!
//! Derives a single deterministic, orderable, SemVer 2 version string from
//! git history facts. The same derivation serves chart versions and image
//! tags; only the watched path set differs.
//!
//! Identifier grammar, given a base version `tag`, a commit count `n` and a
//! short hash `sha`:
//!
//! - `n == 0` and not `--long`:       `{tag}`
//! - `tag` already a prerelease:      `{tag}.git.{n}.h{sha}`
//! - `tag` a bare release:            `{tag}-0.dev.git.{n}.h{sha}`
//!
//! The `0.dev` sentinel sorts before any named prerelease of the same release,
//! and the `h` prefix keeps the hash field from ever being all digits (SemVer 2
//! parses all-digit fields numerically and rejects leading zeros). Build
//! metadata (`+`) is never emitted; container tag syntax forbids it.

use crate::core::error::{GitError, StampError, StampResult};
use crate::core::vcs::GitOracle;
use crate::version::base;
use regex::Regex;
use std::sync::LazyLock;

/// Marker field introducing the git build suffix
pub const GIT_PREFIX: &str = "git";

/// Low-sentinel prerelease field appended to bare releases
pub const PRERELEASE_PREFIX: &str = "0.dev";

/// Base used when history has neither a tag nor a configured base version
pub const DEFAULT_BASE_VERSION: &str = "0.0.1-0.dev";

static BUILD_SUFFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(-0\.dev)?\.git\.\d+\.h[0-9a-f]+\z").expect("valid suffix regex"));

/// Inputs to a derivation besides the watched paths
#[derive(Debug, Clone, Copy, Default)]
pub struct DeriveOptions<'a> {
  /// Explicit override: returned verbatim, bypassing all git-derived logic
  pub explicit_tag: Option<&'a str>,

  /// Emit the build suffix even when sitting exactly on a tag
  pub long: bool,

  /// Operator-configured floor for development versions
  pub base_version: Option<&'a str>,
}

/// Derive the identifier for the given watched paths.
///
/// Pure relative to repository state: repeated calls without history changes
/// produce byte-identical output.
pub fn derive<O: GitOracle>(oracle: &O, paths: &[String], opts: &DeriveOptions) -> StampResult<String> {
  if let Some(tag) = opts.explicit_tag {
    return Ok(tag.to_string());
  }

  let commit = relevant_commit(oracle, paths)?;
  let fact = oracle.latest_tag_and_count(&commit)?;

  // Sitting exactly on a tag wins over everything unless --long asks for the
  // suffix anyway; the count is forced to 0 so the bare tag comes back.
  if let Some(tag) = &fact.tag
    && fact.count == 0
    && !opts.long
  {
    return Ok(format_identifier(tag, 0, &commit, false));
  }

  // The suffix counter is the total commit count, not commits-since-tag, so
  // it never resets when the base version changes.
  let n_commits = oracle.commit_count(&commit)?;

  let base = match opts.base_version {
    Some(configured) => base::check_or_resolve(configured, fact.tag.as_deref(), fact.count)?,
    None => fact.tag.clone().unwrap_or_else(|| DEFAULT_BASE_VERSION.to_string()),
  };

  Ok(format_identifier(&base, n_commits, &commit, opts.long))
}

/// The most relevant commit for a path set: the later (by ancestry) of the
/// latest tagged commit and the latest commit modifying any path.
fn relevant_commit<O: GitOracle>(oracle: &O, paths: &[String]) -> StampResult<String> {
  let modified = oracle.latest_commit_modifying(paths)?;

  let head_fact = oracle.latest_tag_and_count("HEAD")?;
  let tagged = match &head_fact.tag {
    Some(tag) => oracle.resolve_commit(tag)?,
    None => None,
  };

  match (tagged, modified) {
    (Some(tagged), Some(modified)) => {
      if oracle.is_ancestor(&tagged, &modified)? {
        Ok(modified)
      } else {
        // The tag landed after the last modification
        Ok(tagged)
      }
    }
    (Some(tagged), None) => Ok(tagged),
    (None, Some(modified)) => Ok(modified),
    (None, None) => Err(StampError::Git(GitError::NoHistory { paths: paths.to_vec() })),
  }
}

/// Render the identifier grammar for `(tag, n_commits, commit, long)`.
pub fn format_identifier(tag: &str, n_commits: u64, commit: &str, long: bool) -> String {
  if n_commits > 0 || long {
    if tag.contains('-') {
      // continue the existing prerelease with dot-separated fields; the
      // longer field list sorts after the bare prerelease
      format!("{}.{}.{}.h{}", tag, GIT_PREFIX, n_commits, commit)
    } else {
      // open a new prerelease on the bare release
      format!("{}-{}.{}.{}.h{}", tag, PRERELEASE_PREFIX, GIT_PREFIX, n_commits, commit)
    }
  } else {
    tag.to_string()
  }
}

/// Strip the generated build suffix, recovering the base the identifier was
/// built from. Official SemVer 2 build metadata is split away first.
#[allow(dead_code)] // grammar reversal, kept as API alongside format_identifier
pub fn strip_build_suffix(identifier: &str) -> String {
  if let Some((head, _build)) = identifier.split_once('+') {
    return head.to_string();
  }

  BUILD_SUFFIX.replace(identifier, "").into_owned()
}
