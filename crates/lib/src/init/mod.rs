//! Scaffold a new kole project.
//!
//! Writes a commented default `config.yaml`. Existing files are never
//! overwritten.

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use templates::CONFIG_TEMPLATE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Write the default configuration to `path`.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns [`InitError::PathExists`] if `path` already exists, or an I/O
/// variant if the directory or file cannot be written.
pub fn init(path: &Path) -> Result<PathBuf, InitError> {
  if path.exists() {
    return Err(InitError::PathExists {
      path: path.to_path_buf(),
    });
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|e| InitError::CreateDir {
      path: parent.to_path_buf(),
      source: e,
    })?;
  }

  fs::write(path, CONFIG_TEMPLATE).map_err(|e| InitError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })?;
  info!(path = %path.display(), "wrote default config");

  Ok(path.to_path_buf())
}
