//! build-all command integration tests.

#![cfg(unix)]

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_all_builds_every_module() {
  let env = TestEnv::with_launcher("true");

  env
    .islands_cmd()
    .arg("build-all")
    .assert()
    .success()
    .stdout(predicate::str::contains("[1/3] lib"))
    .stdout(predicate::str::contains("[3/3] app"))
    .stdout(predicate::str::contains("All 3 modules built"));

  assert!(env.root().join("lib/target/lib-1.0.jar").is_file());
  assert!(env.root().join("loader/target/loader-1.0.jar").is_file());
  assert!(env.root().join("app/target/app-1.0.jar").is_file());
}

#[test]
fn build_all_stops_at_first_failure() {
  let env = TestEnv::with_failing_module("loader");

  env
    .islands_cmd()
    .arg("build-all")
    .assert()
    .failure()
    .stderr(predicate::str::contains("building(loader)"))
    .stderr(predicate::str::contains("compilation error"));

  assert!(env.root().join("lib/target/lib-1.0.jar").is_file());
  assert!(!env.root().join("app/target").exists());
}

#[test]
fn build_all_verbose_streams_output() {
  let env = TestEnv::with_launcher("true");

  env
    .islands_cmd()
    .args(["build-all", "--verbose"])
    .assert()
    .success()
    .stdout(predicate::str::contains("built lib"));
}

#[test]
fn build_all_unknown_java_version_fails() {
  let env = TestEnv::with_launcher("true");
  let sdkman = tempfile::TempDir::new().unwrap();
  std::fs::create_dir_all(sdkman.path().join("candidates/java/17.0.1-tem")).unwrap();

  env
    .islands_cmd()
    .env("SDKMAN_DIR", sdkman.path())
    .args(["build-all", "--java-version", "99"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("99"));

  assert!(!env.root().join("lib/target").exists());
}

#[test]
fn build_failure_is_reported_once() {
  let env = TestEnv::with_failing_module("lib");

  let output = env.islands_cmd().arg("build-all").output().unwrap();
  assert!(!output.status.success());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert_eq!(stderr.matches("failed").count(), 1, "stderr was:\n{}", stderr);
  assert!(stderr.contains("building(lib)"));
  assert!(stderr.contains("exit code 1"));
}
