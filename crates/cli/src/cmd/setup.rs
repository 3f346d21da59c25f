//! Implementation of `kole --setup`.

use std::path::Path;

use anyhow::{Context, Result};

use kole_lib::config::Configuration;
use kole_lib::setup;

use crate::output::{print_info, print_success};

/// Validate the config at `file` and create the project directories.
pub fn cmd_setup(file: &Path) -> Result<()> {
  let config =
    Configuration::load(file).with_context(|| format!("Failed to load config {}", file.display()))?;

  let created = setup(&config).context("Failed to create project directories")?;

  if created.is_empty() {
    print_info("All project directories already exist");
  } else {
    for dir in &created {
      print_info(&format!("Created {}", dir.display()));
    }
  }
  print_success("Project is set up");

  Ok(())
}
