//! Shared helpers for library tests.

use std::fs;
use std::path::{Path, PathBuf};

use kole_lib::exec::{ToolCommand, ToolError, ToolOutput};
use kole_lib::{Configuration, ToolRunner};

/// Runner that records commands and creates every `-o` target.
#[derive(Default)]
pub struct RecordingRunner {
  pub commands: Vec<ToolCommand>,
  pub runs: Vec<ToolCommand>,
}

impl ToolRunner for RecordingRunner {
  fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
    let args = command.get_args();
    if let Some(target) = args.iter().position(|a| a == "-o").and_then(|i| args.get(i + 1)) {
      let target = PathBuf::from(target);
      fs::create_dir_all(target.parent().unwrap()).unwrap();
      fs::write(&target, b"").unwrap();
    }
    self.commands.push(command.clone());
    Ok(ToolOutput::success())
  }

  fn run_inherited(&mut self, command: &ToolCommand) -> Result<Option<i32>, ToolError> {
    self.runs.push(command.clone());
    Ok(Some(7))
  }
}

/// Write `config.yaml` rooted at `root` and load it back.
pub fn load_config(root: &Path, build_type: &str) -> Configuration {
  let path = root.join("config.yaml");
  fs::write(
    &path,
    format!(
      r#"
directories:
  src: ['{root}/src', '{root}/vendor']
  obj: '{root}/obj'
  bin: '{root}/bin'
  include: ~
ignore: []
flags:
  error_flags: -Wall
  end_flags: ~
build_type: {build_type}
compiler_version: c++
language_version: c++20
output: tool
"#,
      root = root.display(),
      build_type = build_type,
    ),
  )
  .unwrap();
  Configuration::load(&path).unwrap()
}

pub fn write_source(root: &Path, relative: &str) -> PathBuf {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(&path, "int f() { return 0; }\n").unwrap();
  path
}
