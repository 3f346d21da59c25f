//! Test utilities for kole-lib.
//!
//! Cross-platform shell helpers for tests that spawn real processes, a
//! recording [`FakeRunner`] that stands in for the compiler, and helpers for
//! laying out project trees with controlled modification times.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::Configuration;
use crate::exec::{ToolCommand, ToolError, ToolOutput, ToolRunner};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the shell command and args to echo a message.
pub fn shell_echo(msg: &str) -> (&'static str, Vec<String>) {
  shell_cmd(&format!("echo {}", msg))
}

/// A [`ToolRunner`] that records every command instead of running it.
///
/// Whenever a recorded command carries `-o <path>` the fake writes an empty
/// file there, mimicking a compiler producing its output. Commands whose
/// argument list contains `fail_on` exit with status 1.
#[derive(Debug, Default)]
pub struct FakeRunner {
  pub commands: Vec<ToolCommand>,
  pub inherited: Vec<ToolCommand>,
  pub fail_on: Option<String>,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail any command whose arguments mention `needle`.
  pub fn failing_on(needle: &str) -> Self {
    Self {
      fail_on: Some(needle.to_string()),
      ..Self::default()
    }
  }

  /// Commands passed with `-c`, i.e. compile steps.
  pub fn compiles(&self) -> Vec<&ToolCommand> {
    self
      .commands
      .iter()
      .filter(|c| c.get_args().iter().any(|a| a == "-c"))
      .collect()
  }

  /// Commands without `-c`, i.e. link steps.
  pub fn links(&self) -> Vec<&ToolCommand> {
    self
      .commands
      .iter()
      .filter(|c| !c.get_args().iter().any(|a| a == "-c"))
      .collect()
  }
}

fn output_target(command: &ToolCommand) -> Option<PathBuf> {
  let args = command.get_args();
  args
    .iter()
    .position(|a| a == "-o")
    .and_then(|i| args.get(i + 1))
    .map(PathBuf::from)
}

impl ToolRunner for FakeRunner {
  fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
    self.commands.push(command.clone());

    if let Some(needle) = &self.fail_on {
      if command.get_args().iter().any(|a| a.contains(needle.as_str())) {
        return Ok(ToolOutput {
          code: Some(1),
          stdout: String::new(),
          stderr: format!("error: cannot compile {}", needle),
        });
      }
    }

    if let Some(target) = output_target(command) {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
      }
      fs::write(&target, b"").unwrap();
    }

    Ok(ToolOutput::success())
  }

  fn run_inherited(&mut self, command: &ToolCommand) -> Result<Option<i32>, ToolError> {
    self.inherited.push(command.clone());
    Ok(Some(0))
  }
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// Set the modification time of `path` to `offset_secs` relative to now.
pub fn set_mtime(path: &Path, offset_secs: i64) {
  let now = SystemTime::now();
  let time = if offset_secs >= 0 {
    now + Duration::from_secs(offset_secs as u64)
  } else {
    now - Duration::from_secs(offset_secs.unsigned_abs())
  };
  File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

/// A YAML config rooted at `root` with the standard directory layout.
pub fn project_yaml(root: &Path, build_type: &str) -> String {
  format!(
    r#"
directories:
  src: '{root}/src'
  obj: '{root}/obj'
  bin: '{root}/bin'
  include:
    - '{root}/include'
ignore: []
flags:
  error_flags: -Wall -Wextra
  windows_lib_flags: -lgdi32
  unix_lib_flags: -lpthread
  end_flags: -lm
build_type: {build_type}
compiler_version: g++
language_version: c++17
output: app
"#,
    root = root.display(),
    build_type = build_type,
  )
}

/// Parse and validate [`project_yaml`] for `root`.
pub fn project_config(root: &Path, build_type: &str) -> Configuration {
  Configuration::from_yaml_str(&project_yaml(root, build_type)).unwrap()
}
