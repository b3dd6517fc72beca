//! List-images command: print derived image specs without modifying anything

use crate::core::config::StampConfig;
use crate::core::error::StampResult;
use crate::core::vcs::{CachedOracle, SystemGit};
use crate::version::{DeriveOptions, derive};
use serde::Serialize;
use std::env;

/// One derived image reference
#[derive(Debug, Clone, Serialize)]
pub struct ImageListing {
  pub chart: String,
  pub repository: String,
  pub tag: String,
}

impl ImageListing {
  /// Combined `repository:tag` form
  pub fn spec(&self) -> String {
    format!("{}:{}", self.repository, self.tag)
  }
}

/// Run the list-images command
pub fn run_list_images(long: bool, json: bool) -> StampResult<()> {
  let root = env::current_dir()?;
  let config = StampConfig::load(&root)?;
  let oracle = CachedOracle::new(SystemGit::open(&root)?);

  let mut listings = Vec::new();
  for chart in &config.charts {
    for (image_name, image) in &chart.images {
      let opts = DeriveOptions {
        explicit_tag: None,
        long,
        base_version: chart.base_version.as_deref(),
      };
      let tag = derive(&oracle, &image.watched_paths(image_name), &opts)?;

      listings.push(ImageListing {
        chart: chart.name.clone(),
        repository: format!("{}{}", chart.image_prefix, image_name),
        tag,
      });
    }
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&listings)?);
  } else {
    for listing in &listings {
      println!("{}", listing.spec());
    }
  }

  Ok(())
}
