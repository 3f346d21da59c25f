//! Output directory provisioning and object cleanup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Configuration;

#[derive(Debug, Error)]
pub enum DirError {
  #[error("failed to create directory {}: {source}", path.display())]
  Create {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Ensure every configured directory of every non-ignored role exists.
///
/// Missing parents are created too. Existing directories are left untouched,
/// so running this repeatedly is a no-op. Returns the directories it created.
pub fn provision(config: &Configuration) -> Result<Vec<PathBuf>, DirError> {
  let mut created = Vec::new();

  for entry in config.directories() {
    if config.is_ignored(&entry.role) {
      debug!(role = %entry.role, "skipping ignored directory role");
      continue;
    }

    for path in &entry.paths {
      if path.is_dir() {
        continue;
      }

      fs::create_dir_all(path).map_err(|source| DirError::Create {
        path: path.clone(),
        source,
      })?;
      info!(role = %entry.role, path = %path.display(), "created directory");
      created.push(path.clone());
    }
  }

  Ok(created)
}

/// Delete the regular files directly inside the object directory.
///
/// Subdirectories and their contents are left alone. A missing object
/// directory, an unreadable entry or a file that cannot be removed only warns.
/// Returns how many files were removed.
pub fn clear_objects(config: &Configuration) -> usize {
  clear_dir(config.obj_dir())
}

fn clear_dir(dir: &Path) -> usize {
  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      warn!(path = %dir.display(), "object directory does not exist, nothing to clear");
      return 0;
    }
    Err(e) => {
      warn!(path = %dir.display(), error = %e, "cannot read object directory, nothing to clear");
      return 0;
    }
  };

  let mut removed = 0;
  for entry in entries {
    let path = match entry {
      Ok(entry) => entry.path(),
      Err(e) => {
        warn!(path = %dir.display(), error = %e, "failed to read object directory entry");
        continue;
      }
    };
    if !path.is_file() {
      continue;
    }

    match fs::remove_file(&path) {
      Ok(()) => {
        debug!(path = %path.display(), "removed object file");
        removed += 1;
      }
      Err(e) => warn!(path = %path.display(), error = %e, "failed to remove object file"),
    }
  }

  info!(count = removed, path = %dir.display(), "cleared object files");
  removed
}
