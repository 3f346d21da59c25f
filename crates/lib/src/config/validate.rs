//! Emptiness policy for raw configuration documents.
//!
//! Every leaf of the YAML document (anything that is not a mapping) is
//! addressed by its slash-joined key path, e.g. `directories/src` or
//! `flags/end_flags`. A leaf holding an empty value is fatal unless its path is
//! on [`ACCEPTABLE_EMPTY`] or it belongs to an ignored directory role. Accepted
//! empty leaves are rewritten to `""` so later stages never see null.

use std::collections::BTreeSet;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::ConfigError;

/// Leaves that may be left empty.
pub const ACCEPTABLE_EMPTY: &[&str] = &[
  "ignore",
  "flags/error_flags",
  "flags/windows_lib_flags",
  "flags/unix_lib_flags",
  "flags/end_flags",
  "directories/include",
];

/// String spellings that count as "no value".
pub const EMPTY_MARKERS: &[&str] = &["", "None", "-", "[]"];

/// Whether `value` counts as empty: null, an empty sequence or an empty marker string.
pub fn is_empty_value(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Sequence(items) => items.is_empty(),
    Value::String(s) => EMPTY_MARKERS.contains(&s.trim()),
    _ => false,
  }
}

/// Collect every leaf key path of `mapping`, in document order.
pub fn leaf_paths(mapping: &Mapping) -> Vec<String> {
  let mut paths = Vec::new();
  collect_leaf_paths(mapping, "", &mut paths);
  paths
}

fn collect_leaf_paths(mapping: &Mapping, parent: &str, out: &mut Vec<String>) {
  for (key, value) in mapping {
    let key = key_name(key);
    let full_key = if parent.is_empty() {
      key
    } else {
      format!("{}/{}", parent, key)
    };

    match value {
      Value::Mapping(inner) => collect_leaf_paths(inner, &full_key, out),
      _ => out.push(full_key),
    }
  }
}

/// Render a mapping key as text; YAML allows non-string keys.
pub(crate) fn key_name(key: &Value) -> String {
  match key {
    Value::String(s) => s.clone(),
    Value::Number(n) => n.to_string(),
    Value::Bool(b) => b.to_string(),
    Value::Null => "null".to_string(),
    other => format!("{:?}", other),
  }
}

/// Directory roles named by the `ignore` key, before any normalization.
pub fn ignored_roles(document: &Mapping) -> BTreeSet<String> {
  let mut roles = BTreeSet::new();
  match document.get("ignore") {
    Some(Value::Sequence(items)) => {
      for item in items {
        if let Some(role) = item.as_str() {
          if !is_empty_value(item) {
            roles.insert(role.trim().to_string());
          }
        }
      }
    }
    Some(Value::String(role)) if !EMPTY_MARKERS.contains(&role.trim()) => {
      roles.insert(role.trim().to_string());
    }
    _ => {}
  }
  roles
}

fn is_exempt(path: &str, ignored: &BTreeSet<String>) -> bool {
  if ACCEPTABLE_EMPTY.contains(&path) {
    return true;
  }

  match path.strip_prefix("directories/") {
    Some(role) => ignored.contains(role),
    None => false,
  }
}

/// Enforce the emptiness policy on `document`, returning the normalized copy.
///
/// Fails with [`ConfigError::EmptyField`] on the first offending leaf, in
/// document order. Nothing is written anywhere; this is a pure transformation.
pub fn enforce_empty_policy(document: &Mapping) -> Result<Mapping, ConfigError> {
  let ignored = ignored_roles(document);
  let mut normalized = document.clone();

  for path in leaf_paths(document) {
    let parts: Vec<&str> = path.split('/').collect();
    let Some(value) = lookup(document, &parts) else {
      continue;
    };

    if !is_empty_value(value) {
      continue;
    }

    if !is_exempt(&path, &ignored) {
      return Err(ConfigError::EmptyField { key: path });
    }

    debug!(key = %path, "normalizing empty value");
    if let Some(slot) = lookup_mut(&mut normalized, &parts) {
      *slot = Value::String(String::new());
    }
  }

  Ok(normalized)
}

fn lookup<'a>(mapping: &'a Mapping, parts: &[&str]) -> Option<&'a Value> {
  let (last, parents) = parts.split_last()?;
  let mut current = mapping;
  for part in parents {
    current = find(current, part)?.as_mapping()?;
  }
  find(current, last)
}

fn lookup_mut<'a>(mapping: &'a mut Mapping, parts: &[&str]) -> Option<&'a mut Value> {
  let (last, parents) = parts.split_last()?;
  let mut current = mapping;
  for part in parents {
    current = find_mut(current, part)?.as_mapping_mut()?;
  }
  find_mut(current, last)
}

fn find<'a>(mapping: &'a Mapping, name: &str) -> Option<&'a Value> {
  mapping
    .iter()
    .find(|(key, _)| key_name(key) == name)
    .map(|(_, value)| value)
}

fn find_mut<'a>(mapping: &'a mut Mapping, name: &str) -> Option<&'a mut Value> {
  mapping
    .iter_mut()
    .find(|(key, _)| key_name(key) == name)
    .map(|(_, value)| value)
}
