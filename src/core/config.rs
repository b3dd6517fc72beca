//! chartstamp configuration (chartstamp.yaml) parsing and validation
//!
//! The configuration lists charts; each chart carries an optional image map.
//! Field names are camelCase in the file (`imagePrefix`, `baseVersion`,
//! `valuesPath`) to match the established config schema.

use crate::core::error::{ConfigError, StampError, StampResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The config file name; it is also a watched path for every image, since
/// its contents influence what gets stamped.
pub const CONFIG_FILE: &str = "chartstamp.yaml";

/// Fallback chart version written by `chartstamp reset`
pub const DEFAULT_RESET_VERSION: &str = "0.0.1-set.by.chartstamp";

/// Fallback image tag written by `chartstamp reset`
pub const DEFAULT_RESET_TAG: &str = "set-by-chartstamp";

/// Configuration for chartstamp
/// Searched in order: chartstamp.yaml, .chartstamp.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampConfig {
  pub charts: Vec<ChartConfig>,
}

/// One chart entry in chartstamp.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
  /// Chart directory name (holds Chart.yaml and values.yaml)
  pub name: String,

  /// Prefix prepended to every image name (e.g. "myorg/myproject-")
  #[serde(default)]
  pub image_prefix: String,

  /// Extra paths whose modification bumps the chart version
  #[serde(default)]
  pub paths: Vec<String>,

  /// Operator-configured floor for derived development versions.
  /// Also accepts the shorthands "major", "minor", "patch".
  #[serde(default)]
  pub base_version: Option<String>,

  /// Chart version written by `chartstamp reset`
  #[serde(default)]
  pub reset_version: Option<String>,

  /// Image tag written by `chartstamp reset`
  #[serde(default)]
  pub reset_tag: Option<String>,

  /// Images to tag and stamp into values.yaml, keyed by image name
  #[serde(default)]
  pub images: IndexMap<String, ImageConfig>,
}

/// One image entry under a chart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
  /// Dotted path(s) into values.yaml where the image reference lives
  pub values_path: OneOrMany,

  /// Extra paths whose modification bumps this image's tag
  #[serde(default)]
  pub paths: Vec<String>,

  /// Build context directory (defaults to images/<name>)
  #[serde(default)]
  pub context_path: Option<String>,
}

/// A single string or a list of strings (valuesPath accepts both)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
  One(String),
  Many(Vec<String>),
}

impl OneOrMany {
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    let paths: &[String] = match self {
      OneOrMany::One(s) => std::slice::from_ref(s),
      OneOrMany::Many(v) => v.as_slice(),
    };
    paths.iter().map(|s| s.as_str())
  }

  pub fn is_empty(&self) -> bool {
    match self {
      OneOrMany::One(s) => s.is_empty(),
      OneOrMany::Many(v) => v.is_empty(),
    }
  }
}

impl StampConfig {
  /// Find config file in search order: chartstamp.yaml, .chartstamp.yaml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![root.join(CONFIG_FILE), root.join(".chartstamp.yaml")];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from chartstamp.yaml (searches both locations)
  pub fn load(root: &Path) -> StampResult<Self> {
    let config_path = Self::find_config_path(root).ok_or_else(|| {
      StampError::Config(ConfigError::NotFound {
        root: root.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)?;
    let config: StampConfig = serde_yaml::from_str(&content).map_err(|e| {
      StampError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;

    config.validate()?;

    Ok(config)
  }

  /// Validate the configuration
  pub fn validate(&self) -> StampResult<()> {
    if self.charts.is_empty() {
      return Err(StampError::Config(ConfigError::MissingField {
        field: "charts".to_string(),
      }));
    }

    for chart in &self.charts {
      if chart.name.is_empty() {
        return Err(StampError::Config(ConfigError::MissingField {
          field: "charts[].name".to_string(),
        }));
      }

      for (image_name, image) in &chart.images {
        if image.values_path.is_empty() {
          return Err(StampError::Config(ConfigError::EmptyValuesPath {
            image: image_name.clone(),
          }));
        }
      }
    }

    Ok(())
  }
}

impl ChartConfig {
  /// Paths whose modification drives the chart version: the whole tree plus
  /// any explicitly configured paths
  pub fn chart_paths(&self) -> Vec<String> {
    let mut paths = vec![".".to_string()];
    paths.extend(self.paths.iter().cloned());
    paths
  }

  /// Path to this chart's Chart.yaml
  pub fn chart_file(&self) -> PathBuf {
    Path::new(&self.name).join("Chart.yaml")
  }

  /// Path to this chart's values.yaml
  pub fn values_file(&self) -> PathBuf {
    Path::new(&self.name).join("values.yaml")
  }

  /// Chart version used by `chartstamp reset`
  pub fn reset_version(&self) -> &str {
    self.reset_version.as_deref().unwrap_or(DEFAULT_RESET_VERSION)
  }

  /// Image tag used by `chartstamp reset`
  pub fn reset_tag(&self) -> &str {
    self.reset_tag.as_deref().unwrap_or(DEFAULT_RESET_TAG)
  }
}

impl ImageConfig {
  /// Paths whose modification drives this image's tag: configured paths, the
  /// build context, and the config file itself (it can carry build inputs)
  pub fn watched_paths(&self, image_name: &str) -> Vec<String> {
    let mut paths = self.paths.clone();
    paths.push(
      self
        .context_path
        .clone()
        .unwrap_or_else(|| format!("images/{}", image_name)),
    );
    paths.push(CONFIG_FILE.to_string());
    paths
  }
}
