mod cmd;
mod output;

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use kole_lib::BuildOptions;
use kole_lib::config::CONFIG_FILE;

use cmd::{cmd_build, cmd_init, cmd_setup};
use output::print_error;

/// kole - incremental C++ build orchestrator
#[derive(Parser, Debug)]
#[command(name = "kole")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Delete all object files before building
  #[arg(long)]
  clear: bool,

  /// Run the compiled binary after building
  #[arg(long)]
  autorun: bool,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,

  /// Write a default config file and exit
  #[arg(long, conflicts_with_all = ["clear", "autorun", "setup"])]
  init: bool,

  /// Validate the config and create the project directories, then exit
  #[arg(long, conflicts_with_all = ["clear", "autorun"])]
  setup: bool,

  /// Path to the config file
  #[arg(short, long, default_value = CONFIG_FILE)]
  file: PathBuf,

  /// Arguments passed to the binary with --autorun
  #[arg(last = true)]
  run_args: Vec<String>,
}

/// Split `args` into the ones clap understands and the unrecognized ones.
///
/// The program name is kept, everything after `--` is passed through, and the
/// value following a flag that takes one is never inspected.
fn filter_unknown(args: Vec<OsString>) -> (Vec<OsString>, Vec<String>) {
  let command = Cli::command();
  let mut known: HashSet<String> = HashSet::from(["--help", "-h", "--version", "-V"].map(String::from));
  let mut takes_value: HashSet<String> = HashSet::new();

  for arg in command.get_arguments() {
    let mut names = Vec::new();
    if let Some(long) = arg.get_long() {
      names.push(format!("--{}", long));
    }
    if let Some(short) = arg.get_short() {
      names.push(format!("-{}", short));
    }
    for name in names {
      if arg.get_action().takes_values() {
        takes_value.insert(name.clone());
      }
      known.insert(name);
    }
  }

  let mut kept = Vec::with_capacity(args.len());
  let mut unknown = Vec::new();
  let mut iter = args.into_iter();
  kept.extend(iter.next());

  let mut expect_value = false;
  while let Some(arg) = iter.next() {
    if expect_value {
      expect_value = false;
      kept.push(arg);
      continue;
    }

    let text = arg.to_string_lossy().into_owned();
    if text == "--" {
      kept.push(arg);
      kept.extend(iter.by_ref());
      break;
    }

    let name = text.split('=').next().unwrap_or_default();
    if known.contains(name) {
      expect_value = takes_value.contains(name) && !text.contains('=');
      kept.push(arg);
    } else {
      unknown.push(text);
    }
  }

  (kept, unknown)
}

fn main() -> ExitCode {
  let (args, unknown) = filter_unknown(std::env::args_os().collect());
  let cli = match Cli::try_parse_from(args) {
    Ok(cli) => cli,
    Err(err) => {
      // --help and --version arrive here too
      let _ = err.print();
      return if err.use_stderr() {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS
      };
    }
  };

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .without_time()
    .init();

  for arg in &unknown {
    warn!(arg = %arg, "ignoring unrecognized argument");
  }

  let result = if cli.init {
    cmd_init(&cli.file)
  } else if cli.setup {
    cmd_setup(&cli.file)
  } else {
    let options = BuildOptions::default()
      .with_clear(cli.clear)
      .with_autorun(cli.autorun)
      .with_run_args(cli.run_args);
    cmd_build(&cli.file, &options)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
