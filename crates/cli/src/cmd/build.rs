//! Implementation of the default `kole` command: build the project.

use std::path::Path;

use anyhow::{Context, Result};

use kole_lib::config::Configuration;
use kole_lib::{BuildOptions, Os, SystemRunner, build};

use crate::output::{format_duration, print_stat, print_success};

/// Build the project described by the config at `file`.
///
/// Prints the produced binary and how many units were recompiled. When
/// autorunning, the program's own exit status is reported but never turned
/// into a failure.
pub fn cmd_build(file: &Path, options: &BuildOptions) -> Result<()> {
  let config =
    Configuration::load(file).with_context(|| format!("Failed to load config {}", file.display()))?;

  let report = build(&config, options, Os::current(), &mut SystemRunner).context("Build failed")?;

  print_success(&format!(
    "Built {} in {}",
    report.binary.display(),
    format_duration(report.elapsed)
  ));
  print_stat("Recompiled", &report.recompiled.to_string());
  print_stat("Up to date", &report.up_to_date.to_string());
  if options.clear {
    print_stat("Cleared", &report.cleared.to_string());
  }
  if let Some(code) = report.run_exit_code {
    print_stat("Exit code", &code.to_string());
  }

  Ok(())
}
