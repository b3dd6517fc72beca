//! Locate and rewrite image-reference fields in a values tree
//!
//! Each modification addresses one node by dotted path. A mapping node gets
//! its repository key (`name` or `repository`) and `tag` rewritten; a scalar
//! string node is replaced by the combined `repository:tag` form. Everything
//! the modification map does not address is left untouched.

use crate::core::error::{StampError, StampResult, ValuesError};
use crate::values::path::{PathSpec, Segment};
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use std::path::Path;

/// Keys recognized as holding the image repository in a mapping node
const REPOSITORY_KEYS: [&str; 2] = ["name", "repository"];

/// The new image reference for one values path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUpdate {
  pub repository: String,
  pub tag: String,
}

impl ImageUpdate {
  /// Combined `repository:tag` form used for scalar nodes
  pub fn spec(&self) -> String {
    format!("{}:{}", self.repository, self.tag)
  }
}

/// One field that actually changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueChange {
  pub path: String,
  pub old: Option<String>,
  pub new: String,
}

/// Apply a modification map to a parsed values document.
///
/// Returns a change entry for every field whose value differs from before;
/// applying the same map twice yields an empty log the second time.
pub fn apply(
  doc: &mut Value,
  modifications: &IndexMap<String, ImageUpdate>,
  file: &Path,
) -> StampResult<Vec<ValueChange>> {
  let mut changes = Vec::new();

  for (raw_path, update) in modifications {
    let path = PathSpec::parse(raw_path);
    let node = descend(doc, &path, file)?;

    // Closed dispatch on the terminal node's runtime shape
    match &mut *node {
      Value::Mapping(_) => patch_mapping(node, &path, update, file, &mut changes)?,
      Value::String(_) => patch_scalar(node, &path, update, &mut changes),
      other => {
        return Err(StampError::Values(ValuesError::UnsupportedNode {
          path: path.to_string(),
          kind: kind_name(other).to_string(),
          file: file.to_path_buf(),
        }));
      }
    }
  }

  Ok(changes)
}

/// Follow the path segments down to the terminal node
fn descend<'doc>(doc: &'doc mut Value, path: &PathSpec, file: &Path) -> StampResult<&'doc mut Value> {
  let mut node = doc;

  for segment in path.segments() {
    let next = match (segment, node) {
      (Segment::Key(key), Value::Mapping(map)) => map.get_mut(key.as_str()),
      (Segment::Index(index), Value::Sequence(seq)) => seq.get_mut(*index),
      _ => None,
    };

    node = next.ok_or_else(|| {
      StampError::Values(ValuesError::PathNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
        file: file.to_path_buf(),
      })
    })?;
  }

  Ok(node)
}

/// Rewrite `name`/`repository` and `tag` on a mapping node
fn patch_mapping(
  node: &mut Value,
  path: &PathSpec,
  update: &ImageUpdate,
  file: &Path,
  changes: &mut Vec<ValueChange>,
) -> StampResult<()> {
  let Value::Mapping(map) = node else {
    // caller dispatched on Mapping
    return Ok(());
  };

  let present: Vec<&str> = REPOSITORY_KEYS
    .iter()
    .copied()
    .filter(|key| map.contains_key(*key))
    .collect();

  let repo_key = match present.as_slice() {
    [single] => *single,
    [] => {
      return Err(StampError::Values(ValuesError::MissingRepositoryKey {
        path: path.to_string(),
        file: file.to_path_buf(),
      }));
    }
    _ => {
      return Err(StampError::Values(ValuesError::AmbiguousRepositoryKey {
        path: path.to_string(),
        file: file.to_path_buf(),
      }));
    }
  };

  set_field(map, path, repo_key, &update.repository, changes);
  set_field(map, path, "tag", &update.tag, changes);

  Ok(())
}

/// Set one mapping field, logging a change when the value differs
fn set_field(map: &mut serde_yaml::Mapping, path: &PathSpec, key: &str, new: &str, changes: &mut Vec<ValueChange>) {
  let old = map.get(key).map(render_scalar);

  if old.as_deref() != Some(new) {
    changes.push(ValueChange {
      path: format!("{}.{}", path, key),
      old,
      new: new.to_string(),
    });
    map.insert(Value::String(key.to_string()), Value::String(new.to_string()));
  }
}

/// Replace a scalar string node with the combined `repository:tag` form
fn patch_scalar(node: &mut Value, path: &PathSpec, update: &ImageUpdate, changes: &mut Vec<ValueChange>) {
  let image = update.spec();
  let Value::String(existing) = &*node else {
    return;
  };

  if *existing != image {
    changes.push(ValueChange {
      path: path.to_string(),
      old: Some(existing.clone()),
      new: image.clone(),
    });
    *node = Value::String(image);
  }
}

/// Human name for a YAML node's runtime shape
fn kind_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Sequence(_) => "a sequence",
    Value::Mapping(_) => "a mapping",
    Value::Tagged(_) => "a tagged value",
  }
}

/// Render an existing scalar for the change log
fn render_scalar(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => serde_yaml::to_string(other).unwrap_or_default().trim_end().to_string(),
  }
}
