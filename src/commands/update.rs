//! Update command: derive versions and stamp them into chart documents
//!
//! Per chart: derive the chart version from history, write it into
//! Chart.yaml, derive every image's tag, and patch the image references in
//! values.yaml. With --dry-run the changes are printed but nothing is written.

use crate::core::config::{ChartConfig, ImageConfig, StampConfig};
use crate::core::error::{StampError, StampResult};
use crate::core::vcs::{CachedOracle, SystemGit};
use crate::values::{ImageUpdate, ValueChange, document};
use crate::version::{DeriveOptions, derive, fixer};
use indexmap::IndexMap;
use serde_yaml::Value;
use std::env;
use std::path::Path;

/// Run the update command
pub fn run_update(tag: Option<String>, long: bool, strict: bool, dry_run: bool) -> StampResult<()> {
  let root = env::current_dir()?;
  let config = StampConfig::load(&root)?;
  let oracle = CachedOracle::new(SystemGit::open(&root)?);

  // An explicit tag keeps a leading 'v' on image tags, but the chart version
  // field must be SemVer 2, so the prefix is stripped there.
  let chart_override = match tag.as_deref() {
    Some(t) => Some(fixer::fix(t, false)?),
    None => None,
  };

  for chart in &config.charts {
    let opts = DeriveOptions {
      explicit_tag: chart_override.as_deref(),
      long,
      base_version: chart.base_version.as_deref(),
    };
    let chart_version = derive(&oracle, &chart.chart_paths(), &opts)?;
    let chart_version = fixer::fix(&chart_version, strict)?;

    write_chart_version(&root, chart, &chart_version, dry_run)?;

    if chart.images.is_empty() {
      continue;
    }

    let mut modifications = IndexMap::new();
    for (image_name, image) in &chart.images {
      let image_tag = match tag.as_deref() {
        Some(t) => t.to_string(),
        None => {
          let opts = DeriveOptions {
            explicit_tag: None,
            long,
            base_version: chart.base_version.as_deref(),
          };
          derive(&oracle, &image.watched_paths(image_name), &opts)?
        }
      };

      collect_image_updates(&mut modifications, chart, image_name, image, &image_tag);
    }

    apply_image_updates(&root, chart, &modifications, dry_run)?;
  }

  if dry_run {
    println!("🔍 Dry-run mode (no changes applied)");
  }

  Ok(())
}

/// Build the modification map entries for one image
pub(crate) fn collect_image_updates(
  modifications: &mut IndexMap<String, ImageUpdate>,
  chart: &ChartConfig,
  image_name: &str,
  image: &ImageConfig,
  image_tag: &str,
) {
  let repository = format!("{}{}", chart.image_prefix, image_name);

  for values_path in image.values_path.iter() {
    modifications.insert(
      values_path.to_string(),
      ImageUpdate {
        repository: repository.clone(),
        tag: image_tag.to_string(),
      },
    );
  }
}

/// Write the derived version into Chart.yaml, printing what changed
pub(crate) fn write_chart_version(
  root: &Path,
  chart: &ChartConfig,
  version: &str,
  dry_run: bool,
) -> StampResult<()> {
  let chart_file = root.join(chart.chart_file());
  let mut doc = document::load(&chart_file)?;

  let Value::Mapping(map) = &mut doc else {
    return Err(StampError::with_help(
      format!("{} must be a YAML mapping", chart_file.display()),
      "Check that the chart name in chartstamp.yaml points at a chart directory",
    ));
  };

  let current = map.get("version").and_then(Value::as_str);

  if current != Some(version) {
    println!("Updating {}: version: {}", chart.chart_file().display(), version);
    map.insert(Value::String("version".to_string()), Value::String(version.to_string()));

    if !dry_run {
      document::save(&chart_file, &doc)?;
    }
  }

  Ok(())
}

/// Patch values.yaml with the modification map, printing every change
pub(crate) fn apply_image_updates(
  root: &Path,
  chart: &ChartConfig,
  modifications: &IndexMap<String, ImageUpdate>,
  dry_run: bool,
) -> StampResult<Vec<ValueChange>> {
  let values_file = root.join(chart.values_file());
  let mut doc = document::load(&values_file)?;

  let changes = crate::values::apply(&mut doc, modifications, &chart.values_file())?;

  for change in &changes {
    match &change.old {
      Some(old) => println!(
        "Updating {}: {}: {} -> {}",
        chart.values_file().display(),
        change.path,
        old,
        change.new
      ),
      None => println!(
        "Updating {}: {}: {}",
        chart.values_file().display(),
        change.path,
        change.new
      ),
    }
  }

  if !changes.is_empty() && !dry_run {
    document::save(&values_file, &doc)?;
  }

  Ok(changes)
}
