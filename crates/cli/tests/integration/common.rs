//! Shared test helpers for CLI integration tests.

use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in compiler.
///
/// Appends its argument list to `invocations.log`, fails on any argument
/// mentioning `broken`, and otherwise writes a small runnable script to the
/// `-o` target so the "binary" can be autorun.
const FAKE_COMPILER: &str = r#"#!/bin/sh
out=""
prev=""
for a in "$@"; do
  case "$a" in
    *broken*) echo "error: cannot compile $a" >&2; exit 1 ;;
  esac
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
echo "$*" >> "$(dirname "$0")/invocations.log"
printf '#!/bin/sh\necho "hello from app $*"\n' > "$out"
chmod +x "$out"
"#;

/// Isolated project directory with a fake compiler installed.
pub struct TestEnv {
  pub temp: TempDir,
  pub compiler: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let compiler = temp.path().join("fakecc");
    fs::write(&compiler, FAKE_COMPILER).unwrap();
    fs::set_permissions(&compiler, fs::Permissions::from_mode(0o755)).unwrap();
    Self { temp, compiler }
  }

  /// Create a project with a `config.yaml` for `build_type`.
  pub fn with_config(build_type: &str) -> Self {
    let env = Self::new();
    env.write_file("config.yaml", &env.config(build_type));
    env
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  /// Config text using relative project paths and the fake compiler.
  pub fn config(&self, build_type: &str) -> String {
    format!(
      r#"
directories:
  src: src
  obj: obj
  bin: bin
  include: [include]
ignore: []
flags:
  error_flags: -Wall
  windows_lib_flags: -lgdi32
  unix_lib_flags: -lpthread
  end_flags: -lm
build_type: {}
compiler_version: '{}'
language_version: c++17
output: app
"#,
      build_type,
      self.compiler.display()
    )
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.path().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
  }

  /// Write a source file dated well in the past.
  pub fn write_old_source(&self, relative_path: &str) -> PathBuf {
    let path = self.write_file(relative_path, "int main() { return 0; }\n");
    let past = SystemTime::now() - Duration::from_secs(3600);
    File::options().write(true).open(&path).unwrap().set_modified(past).unwrap();
    path
  }

  /// Every compiler invocation so far, one argument string per line.
  pub fn invocations(&self) -> Vec<String> {
    fs::read_to_string(self.path().join("invocations.log"))
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// Compiler invocations that compiled a single unit.
  pub fn compiles(&self) -> Vec<String> {
    self
      .invocations()
      .into_iter()
      .filter(|line| line.split_whitespace().any(|a| a == "-c"))
      .collect()
  }

  pub fn clear_invocations(&self) {
    let _ = fs::remove_file(self.path().join("invocations.log"));
  }

  /// Get a Command for the kole binary running in the project root.
  pub fn kole_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("kole");
    cmd.current_dir(self.path());
    cmd
  }
}
