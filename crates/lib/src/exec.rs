//! Subprocess execution for compiler, linker and the produced binary.
//!
//! Commands are built as a program plus an argument list and handed straight to
//! the OS, never through a shell, so paths with spaces or metacharacters are
//! passed through intact. The [`ToolRunner`] trait is the seam the build
//! pipeline talks to; [`SystemRunner`] is the real implementation.

use std::fmt;
use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Errors raised while invoking an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
  /// The program could not be started at all (not found, not executable, ...).
  #[error("failed to run `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  /// The program ran and reported failure.
  #[error("`{command}` failed ({}){}", describe_exit(.code), format_diagnostics(.diagnostics))]
  Failed {
    command: String,
    code: Option<i32>,
    diagnostics: String,
  },
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "terminated by signal".to_string(),
  }
}

fn format_diagnostics(diagnostics: &str) -> String {
  if diagnostics.is_empty() {
    String::new()
  } else {
    format!(":\n{}", diagnostics)
  }
}

/// A program invocation as an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  program: String,
  args: Vec<String>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  /// Append a single argument.
  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Append every argument from `args` in order.
  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  pub fn get_args(&self) -> &[String] {
    &self.args
  }
}

impl fmt::Display for ToolCommand {
  /// Renders the command the way a user would type it, quoting arguments that
  /// contain whitespace. Only used for diagnostics.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", quote(&self.program))?;
    for arg in &self.args {
      write!(f, " {}", quote(arg))?;
    }
    Ok(())
  }
}

fn quote(word: &str) -> String {
  if word.is_empty() || word.chars().any(char::is_whitespace) {
    format!("\"{}\"", word.replace('"', "\\\""))
  } else {
    word.to_string()
  }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
  /// Exit code, `None` when the process was killed by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ToolOutput {
  /// Output of a process that exited with status 0 and printed nothing.
  pub fn success() -> Self {
    Self {
      code: Some(0),
      ..Self::default()
    }
  }

  pub fn is_success(&self) -> bool {
    self.code == Some(0)
  }

  /// Stdout and stderr joined, trimmed, for error reports.
  pub fn diagnostics(&self) -> String {
    let mut text = String::new();
    let stdout = self.stdout.trim();
    let stderr = self.stderr.trim();
    if !stdout.is_empty() {
      text.push_str(stdout);
    }
    if !stderr.is_empty() {
      if !text.is_empty() {
        text.push('\n');
      }
      text.push_str(stderr);
    }
    text
  }
}

/// Runs external programs on behalf of the build.
pub trait ToolRunner {
  /// Run `command` to completion, capturing stdout and stderr.
  ///
  /// A non-zero exit is reported through [`ToolOutput::code`], not as an error.
  fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput, ToolError>;

  /// Run `command` with stdio inherited from this process and return its exit code.
  fn run_inherited(&mut self, command: &ToolCommand) -> Result<Option<i32>, ToolError>;

  /// Like [`ToolRunner::run`] but turns a non-zero exit into [`ToolError::Failed`].
  fn run_checked(&mut self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
    let output = self.run(command)?;
    if output.is_success() {
      Ok(output)
    } else {
      Err(ToolError::Failed {
        command: command.to_string(),
        code: output.code,
        diagnostics: output.diagnostics(),
      })
    }
  }
}

/// [`ToolRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
  fn command(command: &ToolCommand) -> Command {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args);
    cmd
  }
}

impl ToolRunner for SystemRunner {
  fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
    debug!(cmd = %command, "spawning process");

    let output = Self::command(command).output().map_err(|source| ToolError::Spawn {
      command: command.to_string(),
      source,
    })?;

    let result = ToolOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.stderr.is_empty() {
      debug!(stderr = %result.stderr.trim(), "command stderr");
    }

    Ok(result)
  }

  fn run_inherited(&mut self, command: &ToolCommand) -> Result<Option<i32>, ToolError> {
    debug!(cmd = %command, "spawning process with inherited stdio");

    let status = Self::command(command).status().map_err(|source| ToolError::Spawn {
      command: command.to_string(),
      source,
    })?;

    Ok(status.code())
  }
}
