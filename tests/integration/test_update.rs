//! Integration tests for `chartstamp update`

use crate::helpers::{TestRepo, run_chartstamp, run_chartstamp_raw};

#[test]
fn test_untagged_history_gets_default_base() {
  let repo = TestRepo::new().unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  repo.commit("Second commit").unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  let sha = repo.commit("Third commit").unwrap();

  run_chartstamp(&repo.path, &["update"]).unwrap();

  let expected = format!("0.0.1-0.dev.git.3.h{}", sha);
  assert_eq!(repo.chart_version().unwrap(), expected);

  let values = repo.values().unwrap();
  assert_eq!(values["image"]["name"].as_str(), Some("testchart/testimage"));
  assert_eq!(values["image"]["tag"].as_str(), Some(expected.as_str()));
  assert_eq!(
    values["sidecar"]["image"].as_str(),
    Some(format!("testchart/testimage:{}", expected).as_str())
  );
}

#[test]
fn test_exactly_on_tag_writes_bare_tag() {
  let repo = TestRepo::new().unwrap();
  repo.tag("1.0.0").unwrap();

  run_chartstamp(&repo.path, &["update"]).unwrap();

  assert_eq!(repo.chart_version().unwrap(), "1.0.0");

  let values = repo.values().unwrap();
  assert_eq!(values["image"]["tag"].as_str(), Some("1.0.0"));
  assert_eq!(values["sidecar"]["image"].as_str(), Some("testchart/testimage:1.0.0"));
}

#[test]
fn test_on_tag_with_long_keeps_suffix() {
  let repo = TestRepo::new().unwrap();
  repo.tag("1.0.0").unwrap();
  let sha = repo.head_short().unwrap();

  run_chartstamp(&repo.path, &["update", "--long"]).unwrap();

  assert_eq!(repo.chart_version().unwrap(), format!("1.0.0-0.dev.git.1.h{}", sha));
}

#[test]
fn test_commits_past_tag_use_tag_as_base() {
  let repo = TestRepo::new().unwrap();
  repo.tag("1.0.0").unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  repo.commit("Second commit").unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  let sha = repo.commit("Third commit").unwrap();

  run_chartstamp(&repo.path, &["update"]).unwrap();

  // total commit count, not commits since the tag
  assert_eq!(repo.chart_version().unwrap(), format!("1.0.0-0.dev.git.3.h{}", sha));
}

#[test]
fn test_base_version_takes_precedence_past_tag() {
  let repo = TestRepo::new().unwrap();
  repo.tag("1.0.0").unwrap();

  repo
    .write_file(
      "chartstamp.yaml",
      r#"charts:
  - name: testchart
    imagePrefix: testchart/
    baseVersion: 2.0.0
    images:
      testimage:
        valuesPath:
          - image
          - sidecar.image
        contextPath: images/testimage
"#,
    )
    .unwrap();
  repo.commit("Configure base version").unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  let sha = repo.commit("Third commit").unwrap();

  run_chartstamp(&repo.path, &["update"]).unwrap();

  assert_eq!(repo.chart_version().unwrap(), format!("2.0.0-0.dev.git.3.h{}", sha));
}

#[test]
fn test_base_version_not_greater_than_tag_fails() {
  let repo = TestRepo::new().unwrap();
  repo.tag("1.0.0").unwrap();

  repo
    .write_file(
      "chartstamp.yaml",
      r#"charts:
  - name: testchart
    imagePrefix: testchart/
    baseVersion: 1.0.0
    images:
      testimage:
        valuesPath: image
"#,
    )
    .unwrap();
  repo.commit("Configure stale base version").unwrap();

  let output = run_chartstamp_raw(&repo.path, &["update"]).unwrap();
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("is not greater"), "unexpected stderr: {}", stderr);
  assert!(stderr.contains("1.0.0"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_explicit_tag_overrides_derivation() {
  let repo = TestRepo::new().unwrap();

  run_chartstamp(&repo.path, &["update", "--tag", "v1.2.3"]).unwrap();

  // chart version drops the v prefix; image tags keep it
  assert_eq!(repo.chart_version().unwrap(), "1.2.3");

  let values = repo.values().unwrap();
  assert_eq!(values["image"]["tag"].as_str(), Some("v1.2.3"));
  assert_eq!(values["sidecar"]["image"].as_str(), Some("testchart/testimage:v1.2.3"));
}

#[test]
fn test_strict_rejects_non_semver_explicit_tag() {
  let repo = TestRepo::new().unwrap();

  let output = run_chartstamp_raw(&repo.path, &["update", "--tag", "latest", "--strict"]).unwrap();
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("latest"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_update_is_idempotent() {
  let repo = TestRepo::new().unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  repo.commit("Second commit").unwrap();

  run_chartstamp(&repo.path, &["update"]).unwrap();
  let values_after_first = repo.values().unwrap();

  let output = run_chartstamp(&repo.path, &["update"]).unwrap();
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(!stdout.contains("Updating"), "second run changed something: {}", stdout);
  assert_eq!(repo.values().unwrap(), values_after_first);
}

#[test]
fn test_dry_run_writes_nothing() {
  let repo = TestRepo::new().unwrap();

  let output = run_chartstamp(&repo.path, &["update", "--dry-run"]).unwrap();
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Updating"), "expected planned changes: {}", stdout);
  assert_eq!(repo.chart_version().unwrap(), "0.0.1");
  assert!(repo.status().unwrap().is_empty(), "dry run dirtied the tree");
}

#[test]
fn test_unrelated_values_survive_update() {
  let repo = TestRepo::new().unwrap();

  run_chartstamp(&repo.path, &["update"]).unwrap();

  let values = repo.values().unwrap();
  assert_eq!(values["replicas"].as_u64(), Some(3));
}
