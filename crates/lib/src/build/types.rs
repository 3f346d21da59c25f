use std::path::PathBuf;
use std::time::Duration;

/// Switches that change what a single build run does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
  /// Delete existing object files before compiling, forcing a full rebuild.
  pub clear: bool,
  /// Run the binary after a successful link.
  pub autorun: bool,
  /// Arguments handed to the binary when autorunning.
  pub run_args: Vec<String>,
}

impl BuildOptions {
  pub fn with_clear(mut self, clear: bool) -> Self {
    self.clear = clear;
    self
  }

  pub fn with_autorun(mut self, autorun: bool) -> Self {
    self.autorun = autorun;
    self
  }

  pub fn with_run_args(mut self, args: Vec<String>) -> Self {
    self.run_args = args;
    self
  }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
  pub binary: PathBuf,
  /// Every object that went into the link, in discovery order.
  pub objects: Vec<PathBuf>,
  pub recompiled: usize,
  pub up_to_date: usize,
  /// Object files removed by `clear`.
  pub cleared: usize,
  /// The composed flag string used for every compile and link step.
  pub flags: String,
  /// Exit code of the autorun, `None` when not run or killed by a signal.
  pub run_exit_code: Option<i32>,
  pub elapsed: Duration,
}
