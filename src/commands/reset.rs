//! Reset command: restore committable placeholder versions
//!
//! Writes the configured resetVersion into Chart.yaml and resetTag into every
//! image reference, without consulting git. Used to undo a local update so
//! the working tree can be committed cleanly.

use crate::commands::update::{apply_image_updates, collect_image_updates, write_chart_version};
use crate::core::config::StampConfig;
use crate::core::error::StampResult;
use indexmap::IndexMap;
use std::env;

/// Run the reset command
pub fn run_reset(dry_run: bool) -> StampResult<()> {
  let root = env::current_dir()?;
  let config = StampConfig::load(&root)?;

  for chart in &config.charts {
    write_chart_version(&root, chart, chart.reset_version(), dry_run)?;

    if chart.images.is_empty() {
      continue;
    }

    let mut modifications = IndexMap::new();
    for (image_name, image) in &chart.images {
      collect_image_updates(&mut modifications, chart, image_name, image, chart.reset_tag());
    }

    apply_image_updates(&root, chart, &modifications, dry_run)?;
  }

  if dry_run {
    println!("🔍 Dry-run mode (no changes applied)");
  }

  Ok(())
}
