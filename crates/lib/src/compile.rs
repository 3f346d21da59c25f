//! Incremental compilation of source files into object files.
//!
//! A source is rebuilt only when its object is missing or not strictly newer
//! than the source. Header dependencies are not tracked: touching a header
//! alone never triggers a rebuild.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Configuration;
use crate::exec::{ToolCommand, ToolError, ToolRunner};
use crate::flags::tokenize;

/// File extensions treated as compilable sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c++", "c"];

#[derive(Debug, Error)]
pub enum CompileError {
  #[error("failed to walk source directory {}: {source}", root.display())]
  Walk {
    root: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error(transparent)]
  Tool(#[from] ToolError),
}

/// A source file paired with the object it compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
  pub source: PathBuf,
  pub object: PathBuf,
  /// Whether the object must be rebuilt. Computed once, at discovery.
  pub stale: bool,
}

impl CompilationUnit {
  pub fn new(source: PathBuf, obj_dir: &Path) -> Self {
    let object = object_path(&source, obj_dir);
    let stale = is_stale(&source, &object);
    Self { source, object, stale }
  }
}

/// Object files accumulated during one build, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildState {
  pub objects: Vec<PathBuf>,
  pub recompiled: usize,
  pub up_to_date: usize,
}

/// Whether `path` has one of the [`SOURCE_EXTENSIONS`].
pub fn is_source(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
    .unwrap_or(false)
}

/// `obj_dir/<stem>.o`, where the stem is the file name up to its first dot.
pub fn object_path(source: &Path, obj_dir: &Path) -> PathBuf {
  let name = source
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();
  let stem = name.split('.').next().unwrap_or_default();
  obj_dir.join(format!("{}.o", stem))
}

fn modified(path: &Path) -> Option<SystemTime> {
  fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// A unit is fresh only if its object exists and is strictly newer than the
/// source. Any missing timestamp makes it stale.
pub fn is_stale(source: &Path, object: &Path) -> bool {
  match (modified(source), modified(object)) {
    (Some(src), Some(obj)) => obj <= src,
    _ => true,
  }
}

/// Discover every source under the configured `src` roots.
///
/// Roots are visited in configuration order and each tree is walked sorted by
/// file name, so the result is stable from run to run.
pub fn discover(config: &Configuration) -> Result<Vec<CompilationUnit>, CompileError> {
  let mut units = Vec::new();

  for root in config.src_dirs() {
    for entry in WalkDir::new(root).sort_by_file_name() {
      let entry = entry.map_err(|source| CompileError::Walk {
        root: root.clone(),
        source,
      })?;

      // Follows symlinks, so a linked source counts as a file.
      if !entry.path().is_file() || !is_source(entry.path()) {
        continue;
      }

      units.push(CompilationUnit::new(entry.into_path(), config.obj_dir()));
    }
  }

  Ok(units)
}

/// Build the compile command for a single unit.
///
/// `<compiler> <flags…> -c <src> -o <obj> [-I<inc>…]`
pub fn compile_command(config: &Configuration, flags: &str, unit: &CompilationUnit) -> ToolCommand {
  ToolCommand::new(&config.compiler_version)
    .args(tokenize(flags))
    .arg("-c")
    .arg(unit.source.to_string_lossy())
    .arg("-o")
    .arg(unit.object.to_string_lossy())
    .args(include_args(config))
}

/// One `-I<dir>` argument per include directory.
pub fn include_args(config: &Configuration) -> Vec<String> {
  config
    .include_dirs()
    .iter()
    .map(|dir| format!("-I{}", dir.display()))
    .collect()
}

/// Compile every stale unit and collect all objects into a [`BuildState`].
///
/// Stops at the first failing compiler invocation.
pub fn compile_all<R: ToolRunner>(
  config: &Configuration,
  flags: &str,
  runner: &mut R,
) -> Result<BuildState, CompileError> {
  let units = discover(config)?;
  debug!(count = units.len(), "discovered sources");

  let mut state = BuildState::default();
  for unit in units {
    state.objects.push(unit.object.clone());

    if !unit.stale {
      debug!(source = %unit.source.display(), "up to date");
      state.up_to_date += 1;
      continue;
    }

    info!(source = %unit.source.display(), "compiling");
    runner.run_checked(&compile_command(config, flags, &unit))?;
    state.recompiled += 1;
  }

  Ok(state)
}
