//! Template content for `kole --init`.

/// Default `config.yaml` for a fresh project.
pub const CONFIG_TEMPLATE: &str = r#"# kole project configuration

directories:
  src: src
  obj: obj
  bin: bin
  include:
    - include

# Directory roles that are neither created nor checked for emptiness.
ignore: []

flags:
  error_flags: -Wall -Wextra
  windows_lib_flags: ~
  unix_lib_flags: ~
  end_flags: ~

# debug (-O0) or release (-O3)
build_type: debug
compiler_version: g++
language_version: c++17
output: main
"#;
