//! The build pipeline.
//!
//! A run goes through these stages in order, stopping at the first error:
//!
//! 1. Compose flags (the configuration is already validated at this point)
//! 2. Provision directories
//! 3. Optionally clear object files
//! 4. Compile stale sources
//! 5. Link
//! 6. Optionally run the binary
//!
//! No stage runs before the configuration has been fully validated, so an
//! invalid config never touches the filesystem.

mod types;

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use crate::compile::compile_all;
use crate::config::Configuration;
use crate::dirs;
use crate::error::BuildError;
use crate::exec::ToolRunner;
use crate::flags;
use crate::link::{link, run_binary};
use crate::platform::Os;

pub use types::{BuildOptions, BuildReport};

/// Run a full build of the project described by `config`.
pub fn build<R: ToolRunner>(
  config: &Configuration,
  options: &BuildOptions,
  os: Os,
  runner: &mut R,
) -> Result<BuildReport, BuildError> {
  let start = Instant::now();
  debug!(?options, "starting build");

  let flags = flags::compose(config, os);
  dirs::provision(config)?;

  let cleared = if options.clear { dirs::clear_objects(config) } else { 0 };

  let state = compile_all(config, &flags, runner)?;
  info!(
    recompiled = state.recompiled,
    up_to_date = state.up_to_date,
    "compilation finished"
  );

  let binary = link(config, &flags, &state, os, runner)?;

  let run_exit_code = if options.autorun {
    run_binary(&binary, &options.run_args, os, runner)?
  } else {
    None
  };

  Ok(BuildReport {
    binary,
    objects: state.objects,
    recompiled: state.recompiled,
    up_to_date: state.up_to_date,
    cleared,
    flags,
    run_exit_code,
    elapsed: start.elapsed(),
  })
}

/// Provision the project directories without compiling anything.
///
/// Returns the directories that had to be created.
pub fn setup(config: &Configuration) -> Result<Vec<PathBuf>, BuildError> {
  Ok(dirs::provision(config)?)
}
