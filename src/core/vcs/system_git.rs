//! System git backend - zero dependencies
//!
//! Uses git plumbing commands for all queries:
//! - `git log -1` for latest modification commits
//! - `git describe --tags --long` for tag distance
//! - `git rev-list --count` for the monotonic commit counter
//! - `git merge-base --is-ancestor` for ancestry checks
//!
//! All queries are read-only; chartstamp never mutates repository state.

use crate::core::error::{GitError, ResultExt, StampError, StampResult};
use crate::core::vcs::{GitOracle, TagFact};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> StampResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(StampError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(StampError::message(format!("Failed to open git repository: {}", stderr)));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }

  /// Run a query and return trimmed stdout, mapping failure to a typed error
  fn run_query(&self, args: &[&str]) -> StampResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to run git {}", args.first().copied().unwrap_or("")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(StampError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  fn run_raw(&self, args: &[&str]) -> StampResult<Output> {
    self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to run git {}", args.first().copied().unwrap_or("")))
  }
}

impl GitOracle for SystemGit {
  fn latest_commit_modifying(&self, paths: &[String]) -> StampResult<Option<String>> {
    let mut args: Vec<&str> = vec!["log", "--max-count=1", "--pretty=format:%h", "--"];
    args.extend(paths.iter().map(|p| p.as_str()));

    let stdout = self.run_query(&args)?;
    if stdout.is_empty() {
      return Ok(None);
    }
    Ok(Some(stdout))
  }

  fn latest_tag_and_count(&self, reference: &str) -> StampResult<TagFact> {
    let output = self.run_raw(&["describe", "--tags", "--long", reference])?;

    if !output.status.success() {
      // No tags reachable: the count becomes the total commit count
      let count = self.commit_count(reference)?;
      return Ok(TagFact { tag: None, count });
    }

    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_describe(&described)
  }

  fn commit_count(&self, reference: &str) -> StampResult<u64> {
    let stdout = self.run_query(&["rev-list", "--count", reference])?;
    stdout
      .parse::<u64>()
      .map_err(|_| StampError::message(format!("Unexpected rev-list --count output: '{}'", stdout)))
  }

  fn is_ancestor(&self, ancestor: &str, descendant: &str) -> StampResult<bool> {
    let output = self.run_raw(&["merge-base", "--is-ancestor", ancestor, descendant])?;

    match output.status.code() {
      Some(0) => Ok(true),
      Some(1) => Ok(false),
      _ => {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(StampError::Git(GitError::CommandFailed {
          command: format!("git merge-base --is-ancestor {} {}", ancestor, descendant),
          stderr: stderr.to_string(),
        }))
      }
    }
  }

  fn resolve_commit(&self, reference: &str) -> StampResult<Option<String>> {
    let stdout = self.run_query(&["rev-list", "--abbrev-commit", "-n", "1", reference])?;
    if stdout.is_empty() {
      return Ok(None);
    }
    Ok(Some(stdout))
  }
}

/// Parse `git describe --tags --long` output: `<tag>-<count>-g<sha>`
///
/// The tag itself may contain dashes, so the split runs from the right.
fn parse_describe(described: &str) -> StampResult<TagFact> {
  let mut parts = described.rsplitn(3, '-');
  let sha = parts.next();
  let count = parts.next();
  let tag = parts.next();

  match (tag, count, sha) {
    (Some(tag), Some(count), Some(sha)) if sha.starts_with('g') => {
      let count = count
        .parse::<u64>()
        .map_err(|_| StampError::message(format!("Unexpected git describe output: '{}'", described)))?;
      Ok(TagFact {
        tag: Some(tag.to_string()),
        count,
      })
    }
    _ => Err(StampError::message(format!(
      "Unexpected git describe output: '{}'",
      described
    ))),
  }
}
