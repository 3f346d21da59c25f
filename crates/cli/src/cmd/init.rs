//! Implementation of `kole --init`.
//!
//! Writes a default config file so a new project can be built right away.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use kole_lib::init::{InitError, init};

use crate::output::{print_warning, symbols};

/// Write the default config to `path`.
///
/// An existing file is left alone and only produces a warning.
pub fn cmd_init(path: &Path) -> Result<()> {
  let written = match init(path) {
    Ok(written) => written,
    Err(InitError::PathExists { path }) => {
      print_warning(&format!("{} already exists, leaving it untouched", path.display()));
      return Ok(());
    }
    Err(err) => return Err(err).context("Failed to initialize project"),
  };

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized kole project!".green().bold()
  );
  println!();
  println!("  {} Config: {}", symbols::INFO.cyan(), written.display());
  println!();
  println!("{}", "Next steps:".bold());
  println!("  1. Put your sources under {}", "src/".cyan());
  println!("  2. Run: {}", "kole --autorun".cyan());

  Ok(())
}
