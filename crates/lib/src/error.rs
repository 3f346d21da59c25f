use thiserror::Error;

use crate::compile::CompileError;
use crate::config::ConfigError;
use crate::dirs::DirError;
use crate::exec::ToolError;

/// Any failure that ends a build.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Dir(#[from] DirError),

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error(transparent)]
  Tool(#[from] ToolError),

  #[error("no source files found, nothing to link")]
  EmptyBuild,
}
