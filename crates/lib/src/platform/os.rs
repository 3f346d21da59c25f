use std::fmt;

/// Operating system families kole distinguishes between.
///
/// Only the Windows/non-Windows split changes behavior (library flags, binary
/// extension, run invocation); the remaining variants exist for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
  /// Any other target, carrying the name reported by the standard library.
  Other(&'static str),
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Self {
    Self::from_name(std::env::consts::OS)
  }

  /// Map a `std::env::consts::OS` style name onto an `Os`
  pub fn from_name(name: &'static str) -> Self {
    match name {
      "linux" => Self::Linux,
      "macos" => Self::MacOs,
      "windows" => Self::Windows,
      other => Self::Other(other),
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
      Self::Other(name) => name,
    }
  }

  /// Whether this OS belongs to the Windows family
  pub fn is_windows_family(&self) -> bool {
    matches!(self, Self::Windows)
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
