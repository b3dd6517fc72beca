//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A test chart repository with git history
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  /// Create a repository with a config, one chart, and one commit
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    let repo = Self { _root: root, path };

    repo.write_file(
      "chartstamp.yaml",
      r#"charts:
  - name: testchart
    imagePrefix: testchart/
    images:
      testimage:
        valuesPath:
          - image
          - sidecar.image
        contextPath: images/testimage
"#,
    )?;

    repo.write_file(
      "testchart/Chart.yaml",
      "apiVersion: v1\nname: testchart\nversion: 0.0.1\ndescription: A test chart\n",
    )?;

    repo.write_file(
      "testchart/values.yaml",
      "image:\n  name: dummy/image\n  tag: 0.0.1\nsidecar:\n  image: dummy/sidecar:0.0.1\nreplicas: 3\n",
    )?;

    repo.commit("Initial chart setup")?;

    Ok(repo)
  }

  /// Write a file, creating parent directories
  pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(rel);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Append a line to a file (cheap way to create a modification)
  pub fn touch(&self, rel: &str) -> Result<()> {
    let file_path = self.path.join(rel);
    let mut content = std::fs::read_to_string(&file_path)?;
    content.push_str("# touched\n");
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Commit current changes, returning the short SHA
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    self.head_short()
  }

  /// Short SHA of HEAD, matching the `%h` abbreviation used for identifiers
  pub fn head_short(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "--short", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a lightweight tag at HEAD
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name])?;
    Ok(())
  }

  /// Read a file relative to the repository root
  pub fn read_file(&self, rel: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(rel))?)
  }

  /// Parse the chart's version field out of Chart.yaml
  pub fn chart_version(&self) -> Result<String> {
    let doc: serde_yaml::Value = serde_yaml::from_str(&self.read_file("testchart/Chart.yaml")?)?;
    doc["version"]
      .as_str()
      .map(String::from)
      .context("Chart.yaml has no version field")
  }

  /// Parse values.yaml
  pub fn values(&self) -> Result<serde_yaml::Value> {
    Ok(serde_yaml::from_str(&self.read_file("testchart/values.yaml")?)?)
  }

  /// `git status --porcelain` output (empty means a clean tree)
  pub fn status(&self) -> Result<String> {
    let output = git(&self.path, &["status", "--porcelain"])?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the chartstamp binary, failing the test on a non-zero exit
pub fn run_chartstamp(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_chartstamp_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "chartstamp command failed: chartstamp {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the chartstamp binary without checking the exit status
pub fn run_chartstamp_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_chartstamp");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run chartstamp")
}
