//! Integration tests for `chartstamp list-images`

use crate::helpers::{TestRepo, run_chartstamp};

#[test]
fn test_list_images_prints_derived_spec() {
  let repo = TestRepo::new().unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  repo.commit("Second commit").unwrap();
  repo.touch("chartstamp.yaml").unwrap();
  let sha = repo.commit("Third commit").unwrap();

  let output = run_chartstamp(&repo.path, &["list-images"]).unwrap();
  let stdout = String::from_utf8_lossy(&output.stdout);

  let expected = format!("testchart/testimage:0.0.1-0.dev.git.3.h{}", sha);
  assert_eq!(stdout.trim(), expected);
}

#[test]
fn test_list_images_makes_no_changes() {
  let repo = TestRepo::new().unwrap();

  run_chartstamp(&repo.path, &["list-images"]).unwrap();

  assert!(repo.status().unwrap().is_empty(), "list-images should not make changes");
}

#[test]
fn test_list_images_on_tag() {
  let repo = TestRepo::new().unwrap();
  repo.tag("1.2.3").unwrap();

  let output = run_chartstamp(&repo.path, &["list-images"]).unwrap();
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert_eq!(stdout.trim(), "testchart/testimage:1.2.3");
}

#[test]
fn test_list_images_json() {
  let repo = TestRepo::new().unwrap();
  repo.tag("1.2.3").unwrap();

  let output = run_chartstamp(&repo.path, &["list-images", "--json"]).unwrap();
  let listings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

  assert_eq!(listings.as_array().map(|a| a.len()), Some(1));
  assert_eq!(listings[0]["chart"].as_str(), Some("testchart"));
  assert_eq!(listings[0]["repository"].as_str(), Some("testchart/testimage"));
  assert_eq!(listings[0]["tag"].as_str(), Some("1.2.3"));
}
