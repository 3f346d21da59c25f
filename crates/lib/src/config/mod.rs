//! Project configuration.
//!
//! The configuration file is YAML. Loading happens in two steps: the raw
//! document is checked against the emptiness policy in [`validate`], then the
//! normalized document is turned into a typed [`Configuration`]. Nothing
//! downstream ever looks at the raw document.

pub mod validate;

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, warn};

use self::validate::{enforce_empty_policy, key_name};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Top-level keys kole understands.
pub const KNOWN_KEYS: &[&str] = &[
  "directories",
  "ignore",
  "flags",
  "build_type",
  "compiler_version",
  "language_version",
  "output",
];

/// Keys understood under `flags`.
pub const FLAG_KEYS: &[&str] = &["error_flags", "windows_lib_flags", "unix_lib_flags", "end_flags"];

/// Errors produced while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("couldn't parse config: {0}")]
  Parse(#[from] serde_yaml::Error),

  #[error("config must be a mapping of keys to values")]
  NotAMapping,

  #[error("key '{key}' is not allowed to be empty")]
  EmptyField { key: String },

  #[error("missing required key '{key}'")]
  MissingField { key: String },

  #[error("invalid value for '{key}': {reason}")]
  InvalidValue { key: String, reason: String },

  #[error("invalid build type '{value}' (expected 'debug' or 'release')")]
  InvalidBuildType { value: String },
}

/// Optimization mode selected by `build_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
  Debug,
  Release,
}

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Release => "release",
    }
  }

  /// Compiler optimization flag for this mode.
  pub fn optimization_flag(&self) -> &'static str {
    match self {
      Self::Debug => "-O0",
      Self::Release => "-O3",
    }
  }
}

impl FromStr for BuildType {
  type Err = ConfigError;

  /// Case-insensitive: `Debug`, `DEBUG` and `debug` are all accepted.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "debug" => Ok(Self::Debug),
      "release" => Ok(Self::Release),
      _ => Err(ConfigError::InvalidBuildType { value: s.to_string() }),
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// One entry of the `directories` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
  /// Logical role, e.g. `src` or `obj`.
  pub role: String,
  /// Configured paths in document order. Empty for an emptied optional role.
  pub paths: Vec<PathBuf>,
}

/// Compiler flag fragments; absent or empty ones are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
  pub error_flags: String,
  pub windows_lib_flags: String,
  pub unix_lib_flags: String,
  pub end_flags: String,
}

/// Validated, immutable project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
  directories: Vec<DirectoryEntry>,
  ignore: BTreeSet<String>,
  pub flags: Flags,
  pub build_type: BuildType,
  pub compiler_version: String,
  pub language_version: String,
  pub output: String,
}

impl Configuration {
  /// Load and validate the configuration file at `path`.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_yaml_str(&text)
  }

  /// Parse and validate configuration text.
  pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
    let document: Value = serde_yaml::from_str(text)?;
    Self::from_value(document)
  }

  /// Validate an already parsed document.
  pub fn from_value(document: Value) -> Result<Self, ConfigError> {
    let Value::Mapping(document) = document else {
      return Err(ConfigError::NotAMapping);
    };

    for key in document.keys() {
      let name = key_name(key);
      if !KNOWN_KEYS.contains(&name.as_str()) {
        warn!(key = %name, "unrecognized config key, ignoring");
      }
    }

    let document = enforce_empty_policy(&document)?;

    let ignore = string_list(document.get("ignore"), "ignore")?
      .into_iter()
      .collect::<BTreeSet<_>>();
    let directories = parse_directories(&document)?;
    let flags = parse_flags(&document)?;
    let build_type = required_string(&document, "build_type")?.parse()?;

    let config = Self {
      directories,
      ignore,
      flags,
      build_type,
      compiler_version: required_string(&document, "compiler_version")?,
      language_version: required_string(&document, "language_version")?,
      output: required_string(&document, "output")?,
    };

    // Roles the build itself reads must name a path even when ignored.
    for role in ["src", "obj", "bin"] {
      if config.paths(role).is_empty() {
        return Err(ConfigError::EmptyField {
          key: format!("directories/{}", role),
        });
      }
    }

    Ok(config)
  }

  /// All configured directory entries in document order.
  pub fn directories(&self) -> &[DirectoryEntry] {
    &self.directories
  }

  /// Paths configured for `role`, empty when the role is absent.
  pub fn paths(&self, role: &str) -> &[PathBuf] {
    self
      .directories
      .iter()
      .find(|entry| entry.role == role)
      .map(|entry| entry.paths.as_slice())
      .unwrap_or(&[])
  }

  pub fn src_dirs(&self) -> &[PathBuf] {
    self.paths("src")
  }

  pub fn include_dirs(&self) -> &[PathBuf] {
    self.paths("include")
  }

  /// The single object directory.
  pub fn obj_dir(&self) -> &Path {
    &self.paths("obj")[0]
  }

  /// The single binary directory.
  pub fn bin_dir(&self) -> &Path {
    &self.paths("bin")[0]
  }

  /// Whether `role` is listed under `ignore`.
  pub fn is_ignored(&self, role: &str) -> bool {
    self.ignore.contains(role)
  }

  pub fn ignored(&self) -> &BTreeSet<String> {
    &self.ignore
  }
}

fn parse_directories(document: &Mapping) -> Result<Vec<DirectoryEntry>, ConfigError> {
  let mapping = match document.get("directories") {
    Some(Value::Mapping(mapping)) => mapping,
    Some(_) => {
      return Err(ConfigError::InvalidValue {
        key: "directories".to_string(),
        reason: "expected a mapping of directory roles".to_string(),
      });
    }
    None => {
      return Err(ConfigError::MissingField {
        key: "directories/src".to_string(),
      });
    }
  };

  for role in ["src", "obj", "bin"] {
    if mapping.get(role).is_none() {
      return Err(ConfigError::MissingField {
        key: format!("directories/{}", role),
      });
    }
  }

  let mut entries = Vec::with_capacity(mapping.len());
  for (key, value) in mapping {
    let role = key_name(key);
    let field = format!("directories/{}", role);
    let mut paths: Vec<PathBuf> = string_list(Some(value), &field)?
      .into_iter()
      .map(PathBuf::from)
      .collect();

    if (role == "obj" || role == "bin") && paths.len() > 1 {
      warn!(
        key = %field,
        using = %paths[0].display(),
        "only one directory is supported, ignoring the rest"
      );
      paths.truncate(1);
    }

    entries.push(DirectoryEntry { role, paths });
  }

  Ok(entries)
}

fn parse_flags(document: &Mapping) -> Result<Flags, ConfigError> {
  let mapping = match document.get("flags") {
    Some(Value::Mapping(mapping)) => mapping,
    None => return Ok(Flags::default()),
    Some(_) => {
      return Err(ConfigError::InvalidValue {
        key: "flags".to_string(),
        reason: "expected a mapping of flag groups".to_string(),
      });
    }
  };

  for key in mapping.keys() {
    let name = key_name(key);
    if !FLAG_KEYS.contains(&name.as_str()) {
      warn!(key = %format!("flags/{}", name), "unrecognized flag group, ignoring");
    }
  }

  let flag = |name: &str| -> Result<String, ConfigError> {
    let key = format!("flags/{}", name);
    let value = optional_string(mapping.get(name), &key)?;
    if shlex::split(&value).is_none() {
      return Err(ConfigError::InvalidValue {
        key,
        reason: "unbalanced quote or trailing backslash".to_string(),
      });
    }
    Ok(value)
  };

  Ok(Flags {
    error_flags: flag("error_flags")?,
    windows_lib_flags: flag("windows_lib_flags")?,
    unix_lib_flags: flag("unix_lib_flags")?,
    end_flags: flag("end_flags")?,
  })
}

fn scalar_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.trim().to_string()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Null => Some(String::new()),
    _ => None,
  }
}

fn required_string(document: &Mapping, key: &str) -> Result<String, ConfigError> {
  let value = document.get(key).ok_or_else(|| ConfigError::MissingField {
    key: key.to_string(),
  })?;
  scalar_string(value).ok_or_else(|| ConfigError::InvalidValue {
    key: key.to_string(),
    reason: "expected a single value".to_string(),
  })
}

fn optional_string(value: Option<&Value>, key: &str) -> Result<String, ConfigError> {
  match value {
    None => Ok(String::new()),
    Some(value) => scalar_string(value).ok_or_else(|| ConfigError::InvalidValue {
      key: key.to_string(),
      reason: "expected a single value".to_string(),
    }),
  }
}

/// A scalar or a sequence of scalars, flattened into non-empty strings.
fn string_list(value: Option<&Value>, key: &str) -> Result<Vec<String>, ConfigError> {
  let invalid = || ConfigError::InvalidValue {
    key: key.to_string(),
    reason: "expected a path or a list of paths".to_string(),
  };

  let items = match value {
    None => return Ok(Vec::new()),
    Some(Value::Sequence(items)) => items
      .iter()
      .map(|item| scalar_string(item).ok_or_else(invalid))
      .collect::<Result<Vec<_>, _>>()?,
    Some(value) => vec![scalar_string(value).ok_or_else(invalid)?],
  };

  Ok(items.into_iter().filter(|item| !item.is_empty()).collect())
}
