//! Host platform identification.
//!
//! Everything that varies by operating system goes through here: which library
//! flags apply, the extension of the linked binary, and how that binary is
//! invoked when autorunning.

pub mod os;

use std::path::{Path, PathBuf};

pub use os::Os;

/// Extension (without the dot) given to the linked binary.
pub fn binary_extension(os: Os) -> &'static str {
  if os.is_windows_family() { "exe" } else { "out" }
}

/// Path used to launch a freshly linked binary.
///
/// On Windows every `/` is turned into `\`. Elsewhere a relative path gets a
/// `./` prefix so it is resolved against the working directory instead of
/// `PATH`; absolute paths are left untouched.
pub fn invocation_path(binary: &Path, os: Os) -> PathBuf {
  if os.is_windows_family() {
    return PathBuf::from(binary.to_string_lossy().replace('/', "\\"));
  }

  if binary.is_absolute() || binary.starts_with(".") || binary.starts_with("..") {
    binary.to_path_buf()
  } else {
    Path::new(".").join(binary)
  }
}
