//! kole-lib: incremental build orchestration for C++ projects
//!
//! This crate holds everything the `kole` binary does:
//! - `config`: loading and validating `config.yaml`
//! - `dirs`: creating the project layout and clearing object files
//! - `flags`: composing compiler flags per platform and build type
//! - `compile`: rebuilding only the sources whose objects are out of date
//! - `link`: linking objects into the binary and running it
//! - `build`: the pipeline tying these together

pub mod build;
pub mod compile;
pub mod config;
pub mod dirs;
pub mod error;
pub mod exec;
pub mod flags;
pub mod init;
pub mod link;
pub mod platform;
pub mod util;

pub use build::{BuildOptions, BuildReport, build, setup};
pub use config::{BuildType, Configuration};
pub use error::BuildError;
pub use exec::{SystemRunner, ToolRunner};
pub use platform::Os;
