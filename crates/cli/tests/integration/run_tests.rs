//! run-islands command integration tests.
//!
//! The launcher is swapped for `true`/`false` so the "runtime" exits at once.

#![cfg(unix)]

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn run_islands_builds_assembles_and_launches() {
  let env = TestEnv::with_launcher("true");

  env
    .islands_cmd()
    .arg("run-islands")
    .assert()
    .success()
    .stdout(predicate::str::contains("[2/3] loader"))
    .stdout(predicate::str::contains("Islands exited"));

  assert!(env.output().join("loader-1.0.jar").is_file());
  assert!(env.output().join("config.json").is_file());
}

#[test]
fn run_islands_skip_build_uses_existing_artifacts() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();

  env
    .islands_cmd()
    .args(["run-islands", "--skip-build"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Skipping build"))
    .stdout(predicate::str::contains("[1/3]").not());
}

#[test]
fn run_islands_skip_build_without_artifacts_fails() {
  let env = TestEnv::with_launcher("true");

  env
    .islands_cmd()
    .args(["run-islands", "--fast-build"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("islands build-all"));
}

#[test]
fn run_islands_propagates_runtime_exit_code() {
  let env = TestEnv::with_launcher("false");

  env.islands_cmd().arg("run-islands").assert().code(1);
  assert!(env.output().join("config.json").is_file());
}

#[test]
fn run_islands_stops_on_build_failure() {
  let env = TestEnv::with_failing_module("app");

  env
    .islands_cmd()
    .arg("run-islands")
    .assert()
    .failure()
    .stderr(predicate::str::contains("building(app)"));

  assert!(!env.output().exists());
}

#[test]
fn run_islands_missing_launcher_fails() {
  let env = TestEnv::with_launcher("/nonexistent/java");
  env.write_all_artifacts();

  env
    .islands_cmd()
    .args(["run-islands", "--skip-build"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("launching"));
}

#[test]
fn run_islands_no_clean_keeps_output() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();
  env.write_file("output/notes.txt", "keep me");

  env
    .islands_cmd()
    .args(["run-islands", "--skip-build", "--no-clean"])
    .assert()
    .success();

  assert!(env.output().join("notes.txt").is_file());
}
