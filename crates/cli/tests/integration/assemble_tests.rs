//! assemble command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn assemble_stages_built_artifacts() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();

  env
    .islands_cmd()
    .arg("assemble")
    .assert()
    .success()
    .stdout(predicate::str::contains("Output assembled"));

  let output = env.output();
  assert!(output.join("loader-1.0.jar").is_file());
  assert!(output.join("modules/lib-1.0.jar").is_file());
  assert!(output.join("modules/app-1.0.jar").is_file());
  assert!(!output.join("modules/loader-1.0.jar").exists());

  let config: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(output.join("config.json")).unwrap()).unwrap();
  assert_eq!(config["port"], 8080);
  assert_eq!(config["fileWatcher"], true);
  let sources = config["sources"].as_array().unwrap();
  assert_eq!(sources.len(), 1);
  assert_eq!(
    std::path::PathBuf::from(sources[0].as_str().unwrap()),
    std::path::absolute(output.join("modules")).unwrap()
  );
}

#[test]
fn assemble_resets_output_by_default() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();
  env.write_file("output/stale.txt", "old");

  env.islands_cmd().arg("assemble").assert().success();

  assert!(!env.output().join("stale.txt").exists());
}

#[test]
fn assemble_no_clean_keeps_unrelated_files() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();
  env.write_file("output/stale.txt", "old");

  env.islands_cmd().args(["assemble", "--no-clean"]).assert().success();

  assert!(env.output().join("stale.txt").is_file());
  assert!(env.output().join("config.json").is_file());
}

#[test]
fn assemble_picks_greatest_version() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();
  env.write_file("app/target/app-2.0.jar", "app 2");

  env.islands_cmd().arg("assemble").assert().success();

  assert!(env.output().join("modules/app-2.0.jar").is_file());
  assert!(!env.output().join("modules/app-1.0.jar").exists());
}

#[test]
fn assemble_missing_plugin_writes_no_config() {
  let env = TestEnv::with_launcher("true");
  env.write_file("lib/target/lib-1.0.jar", "lib");
  env.write_file("loader/target/loader-1.0.jar", "loader");

  env
    .islands_cmd()
    .arg("assemble")
    .assert()
    .failure()
    .stderr(predicate::str::contains("app"));

  assert!(!env.output().join("config.json").exists());
}

#[test]
fn status_after_assemble_counts_staged_jars() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();
  env.islands_cmd().arg("assemble").assert().success();

  let output = env.islands_cmd().args(["status", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["output_exists"], true);
  assert_eq!(json["staged_jars"], 3);
}

#[test]
fn output_dir_covering_the_workspace_is_refused() {
  let env = TestEnv::with_launcher("true");
  env.write_all_artifacts();
  env.write_file("lib/pom.xml", "<project/>");

  env
    .islands_cmd()
    .env("ISLANDS_OUTPUT_DIR", env.root())
    .arg("assemble")
    .assert()
    .failure()
    .stderr(predicate::str::contains("would remove"));

  assert!(env.root().join("lib/pom.xml").is_file());
  assert!(env.root().join("loader/target/loader-1.0.jar").is_file());
}
