//! Linking objects into the final binary, and running it.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::compile::{BuildState, include_args};
use crate::config::Configuration;
use crate::error::BuildError;
use crate::exec::{ToolCommand, ToolError, ToolRunner};
use crate::flags::tokenize;
use crate::platform::{self, Os};

/// `<bin>/<output>.<exe|out>`
pub fn binary_path(config: &Configuration, os: Os) -> PathBuf {
  config
    .bin_dir()
    .join(format!("{}.{}", config.output, platform::binary_extension(os)))
}

/// Build the link command.
///
/// `<compiler> -std=<lang> <flags…> [-I<inc>…] -o <binary> <objects…> <end_flags…>`
pub fn link_command(config: &Configuration, flags: &str, state: &BuildState, binary: &Path) -> ToolCommand {
  ToolCommand::new(&config.compiler_version)
    .arg(format!("-std={}", config.language_version))
    .args(tokenize(flags))
    .args(include_args(config))
    .arg("-o")
    .arg(binary.to_string_lossy())
    .args(state.objects.iter().map(|obj| obj.to_string_lossy().into_owned()))
    .args(tokenize(&config.flags.end_flags))
}

/// Link every object in `state` into the output binary and return its path.
///
/// An empty object list fails with [`BuildError::EmptyBuild`] before the
/// linker is invoked.
pub fn link<R: ToolRunner>(
  config: &Configuration,
  flags: &str,
  state: &BuildState,
  os: Os,
  runner: &mut R,
) -> Result<PathBuf, BuildError> {
  if state.objects.is_empty() {
    return Err(BuildError::EmptyBuild);
  }

  let binary = binary_path(config, os);
  info!(objects = state.objects.len(), output = %binary.display(), "linking");
  runner.run_checked(&link_command(config, flags, state, &binary))?;
  info!(output = %binary.display(), "build finished");

  Ok(binary)
}

/// Run the linked binary with inherited stdio and return its exit code.
///
/// The exit code is informational; a non-zero status is only logged.
pub fn run_binary<R: ToolRunner>(
  binary: &Path,
  args: &[String],
  os: Os,
  runner: &mut R,
) -> Result<Option<i32>, ToolError> {
  let program = platform::invocation_path(binary, os);
  info!(binary = %program.display(), "running");

  let code = runner.run_inherited(&ToolCommand::new(program.to_string_lossy()).args(args.iter().cloned()))?;
  match code {
    Some(0) => info!("program exited successfully"),
    Some(code) => warn!(code, "program exited with non-zero status"),
    None => warn!("program terminated by signal"),
  }

  Ok(code)
}
