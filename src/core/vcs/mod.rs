pub mod cache;
pub mod system_git;

pub use cache::CachedOracle;
pub use system_git::SystemGit;

use crate::core::error::StampResult;

/// The nearest reachable tag for a ref plus the number of commits since it.
///
/// `tag == None` means the history has no reachable tag; `count` then carries
/// the total commit count instead of commits-since-tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFact {
  pub tag: Option<String>,
  pub count: u64,
}

/// Read-only git queries consumed by the version engine.
///
/// Implementations must be pure lookups relative to a fixed repository state:
/// repeated calls with the same arguments return the same answer until the
/// repository changes. That property is what makes [`CachedOracle`] safe.
pub trait GitOracle {
  /// Short hash of the latest commit modifying any of `paths`, if one exists.
  fn latest_commit_modifying(&self, paths: &[String]) -> StampResult<Option<String>>;

  /// Nearest reachable tag and commits-since-tag for `reference`.
  fn latest_tag_and_count(&self, reference: &str) -> StampResult<TagFact>;

  /// Total number of commits reachable from `reference`.
  fn commit_count(&self, reference: &str) -> StampResult<u64>;

  /// Whether `ancestor` is an ancestor of (or equal to) `descendant`.
  fn is_ancestor(&self, ancestor: &str, descendant: &str) -> StampResult<bool>;

  /// Short hash of the commit a ref (e.g. a tag name) points at.
  fn resolve_commit(&self, reference: &str) -> StampResult<Option<String>>;
}
