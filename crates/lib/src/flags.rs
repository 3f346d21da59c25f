//! Compiler flag composition.

use tracing::{info, warn};

use crate::config::{BuildType, Configuration};
use crate::platform::Os;

/// Compose the flag string shared by every compile and link step.
///
/// Layout: `<error_flags> <platform lib flags> -O0|-O3`. The Windows library
/// flags are used on Windows, the Unix ones everywhere else.
pub fn compose(config: &Configuration, os: Os) -> String {
  info!(os = %os, "detected operating system");

  let mut flags = config.flags.error_flags.clone();
  flags.push(' ');

  if os.is_windows_family() {
    info!("applying windows library flags");
    flags.push_str(&config.flags.windows_lib_flags);
  } else {
    info!("applying unix library flags");
    flags.push_str(&config.flags.unix_lib_flags);
  }

  if config.build_type == BuildType::Release {
    info!("building in release mode");
  }
  flags.push(' ');
  flags.push_str(config.build_type.optimization_flag());

  flags
}

/// Split a flag string into individual arguments using shell quoting rules,
/// so `-DNAME="a b"` stays one argument.
///
/// Flag fragments are checked for balanced quoting when the configuration is
/// loaded. A string that still fails to split falls back to whitespace.
pub fn tokenize(flags: &str) -> Vec<String> {
  shlex::split(flags).unwrap_or_else(|| {
    warn!(flags, "unbalanced quoting in flags, splitting on whitespace");
    flags.split_whitespace().map(str::to_string).collect()
  })
}
