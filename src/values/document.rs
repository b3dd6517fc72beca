//! YAML document load/store
//!
//! One full load-mutate-store cycle per invocation; chartstamp is the single
//! writer of the documents it touches.

use crate::core::error::{StampError, StampResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Load a YAML document into a mutable value tree
pub fn load(path: &Path) -> StampResult<Value> {
  let content = fs::read_to_string(path)
    .map_err(|e| StampError::message(format!("Failed to read {}: {}", path.display(), e)))?;
  let doc: Value = serde_yaml::from_str(&content)
    .map_err(|e| StampError::message(format!("Failed to parse {}: {}", path.display(), e)))?;
  Ok(doc)
}

/// Persist a YAML document back to disk
pub fn save(path: &Path, doc: &Value) -> StampResult<()> {
  let content = serde_yaml::to_string(doc)
    .map_err(|e| StampError::message(format!("Failed to serialize {}: {}", path.display(), e)))?;
  fs::write(path, content).map_err(|e| StampError::message(format!("Failed to write {}: {}", path.display(), e)))?;
  Ok(())
}
