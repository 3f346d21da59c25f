//! Build command integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn release_build_compiles_and_links() {
  let env = TestEnv::with_config("Release");
  env.write_old_source("src/main.cpp");
  env.write_old_source("src/util.cpp");

  env
    .kole_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Built bin/app.out"))
    .stdout(predicate::str::contains("release mode"));

  let invocations = env.invocations();
  assert_eq!(invocations.len(), 3);
  assert!(invocations[0].starts_with("-Wall -lpthread -O3 -c src/main.cpp -o obj/main.o -Iinclude"));
  assert!(invocations[1].contains("-c src/util.cpp -o obj/util.o"));
  assert_eq!(
    invocations[2],
    "-std=c++17 -Wall -lpthread -O3 -Iinclude -o bin/app.out obj/main.o obj/util.o -lm"
  );
  assert!(env.path().join("bin/app.out").exists());
}

#[test]
#[serial]
fn rebuild_skips_fresh_units() {
  let env = TestEnv::with_config("debug");
  env.write_old_source("src/a.cpp");
  env.write_old_source("src/b.cpp");

  env.kole_cmd().assert().success();
  assert_eq!(env.compiles().len(), 2);

  env.clear_invocations();
  env.write_file("src/b.cpp", "int b() { return 1; }\n");
  env.kole_cmd().assert().success();

  let compiles = env.compiles();
  assert_eq!(compiles.len(), 1);
  assert!(compiles[0].contains("src/b.cpp"));
  assert_eq!(env.invocations().len(), 2, "one compile plus the link");
}

#[test]
#[serial]
fn clear_forces_full_rebuild() {
  let env = TestEnv::with_config("debug");
  env.write_old_source("src/a.cpp");
  env.write_old_source("src/b.cpp");
  env.kole_cmd().assert().success();

  env.clear_invocations();
  env.kole_cmd().arg("--clear").assert().success();

  assert_eq!(env.compiles().len(), 2);
}

#[test]
#[serial]
fn autorun_executes_binary_with_forwarded_args() {
  let env = TestEnv::with_config("debug");
  env.write_old_source("src/main.cpp");

  env
    .kole_cmd()
    .args(["--autorun", "--", "one", "two"])
    .assert()
    .success()
    .stdout(predicate::str::contains("hello from app one two"));
}

#[test]
#[serial]
fn compile_failure_stops_the_build() {
  let env = TestEnv::with_config("debug");
  env.write_old_source("src/a.cpp");
  env.write_old_source("src/broken.cpp");
  env.write_old_source("src/c.cpp");

  env
    .kole_cmd()
    .arg("--autorun")
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("cannot compile src/broken.cpp"));

  assert_eq!(env.invocations().len(), 1, "only a.cpp compiled before the failure");
  assert!(!env.path().join("bin/app.out").exists());
}

#[test]
#[serial]
fn no_sources_means_no_link() {
  let env = TestEnv::with_config("debug");

  env
    .kole_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("no source files found"));

  assert!(env.invocations().is_empty());
  assert!(env.path().join("obj").is_dir());
}
