//! CLI smoke tests for islands.
//!
//! These tests verify that every subcommand parses, runs without panicking
//! and returns the expected exit code on an unbuilt workspace.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the islands binary, pointed at `workspace`.
fn islands_cmd(workspace: &TempDir) -> Command {
  let mut cmd = cargo_bin_cmd!("islands");
  cmd.arg("--workspace").arg(workspace.path());
  cmd.env_remove("ISLANDS_OUTPUT_DIR");
  cmd.env_remove("ISLANDS_JAVA_VERSION");
  cmd.env_remove("RUST_LOG");
  cmd
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  cargo_bin_cmd!("islands")
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  cargo_bin_cmd!("islands")
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("islands"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build-all", "run-islands", "assemble", "clean", "status", "info"] {
    cargo_bin_cmd!("islands")
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn fast_build_alias_is_accepted() {
  cargo_bin_cmd!("islands")
    .args(["run-islands", "--fast-build", "--help"])
    .assert()
    .success();
}

#[test]
fn unknown_subcommand_fails() {
  cargo_bin_cmd!("islands").arg("launch-everything").assert().failure();
}

#[test]
fn missing_workspace_fails() {
  let temp = TempDir::new().unwrap();
  cargo_bin_cmd!("islands")
    .arg("--workspace")
    .arg(temp.path().join("nope"))
    .arg("status")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load workspace"));
}

// =============================================================================
// Read-only commands
// =============================================================================

#[test]
#[serial]
fn status_on_unbuilt_workspace() {
  let temp = TempDir::new().unwrap();
  islands_cmd(&temp)
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("ModularKit"))
    .stdout(predicate::str::contains("CoffeeLoader"))
    .stdout(predicate::str::contains("not built"));
}

#[test]
#[serial]
fn status_json_is_valid() {
  let temp = TempDir::new().unwrap();
  let output = islands_cmd(&temp).args(["status", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["modules"].as_array().unwrap().len(), 3);
  assert_eq!(json["output_exists"], false);
}

#[test]
#[serial]
fn info_shows_defaults() {
  let temp = TempDir::new().unwrap();
  islands_cmd(&temp)
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("none (using defaults)"))
    .stdout(predicate::str::contains("mvn"));
}

#[test]
#[serial]
fn info_json_is_valid() {
  let temp = TempDir::new().unwrap();
  let output = islands_cmd(&temp).args(["info", "--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert!(json["workspace_file"].is_null());
  assert_eq!(json["modules"][1]["role"], "runner");
}

// =============================================================================
// Clean & Assemble
// =============================================================================

#[test]
#[serial]
fn clean_is_idempotent() {
  let temp = TempDir::new().unwrap();
  islands_cmd(&temp)
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));

  std::fs::create_dir_all(temp.path().join("output/modules")).unwrap();
  islands_cmd(&temp)
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed"));
  assert!(!temp.path().join("output").exists());
}

#[test]
#[serial]
fn assemble_without_build_fails() {
  let temp = TempDir::new().unwrap();
  islands_cmd(&temp)
    .arg("assemble")
    .assert()
    .failure()
    .stderr(predicate::str::contains("assembling"))
    .stderr(predicate::str::contains("islands build-all"));
}
