//! Integration tests for `chartstamp reset`

use crate::helpers::{TestRepo, run_chartstamp};

#[test]
fn test_reset_restores_placeholder_values() {
  let repo = TestRepo::new().unwrap();

  run_chartstamp(&repo.path, &["update"]).unwrap();
  run_chartstamp(&repo.path, &["reset"]).unwrap();

  assert_eq!(repo.chart_version().unwrap(), "0.0.1-set.by.chartstamp");

  let values = repo.values().unwrap();
  assert_eq!(values["image"]["name"].as_str(), Some("testchart/testimage"));
  assert_eq!(values["image"]["tag"].as_str(), Some("set-by-chartstamp"));
  assert_eq!(
    values["sidecar"]["image"].as_str(),
    Some("testchart/testimage:set-by-chartstamp")
  );
}

#[test]
fn test_reset_honors_configured_values() {
  let repo = TestRepo::new().unwrap();
  repo
    .write_file(
      "chartstamp.yaml",
      r#"charts:
  - name: testchart
    imagePrefix: testchart/
    resetVersion: 9.9.9-reset
    resetTag: reset-me
    images:
      testimage:
        valuesPath: image
"#,
    )
    .unwrap();
  repo.commit("Configure reset values").unwrap();

  run_chartstamp(&repo.path, &["reset"]).unwrap();

  assert_eq!(repo.chart_version().unwrap(), "9.9.9-reset");
  assert_eq!(repo.values().unwrap()["image"]["tag"].as_str(), Some("reset-me"));
}

#[test]
fn test_reset_is_idempotent() {
  let repo = TestRepo::new().unwrap();

  run_chartstamp(&repo.path, &["reset"]).unwrap();
  let output = run_chartstamp(&repo.path, &["reset"]).unwrap();
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(!stdout.contains("Updating"), "second reset changed something: {}", stdout);
}
