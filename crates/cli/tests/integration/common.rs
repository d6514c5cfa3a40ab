//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated workspace with three fake modules.
///
/// Each module's build command is a shell snippet that drops a versioned jar
/// into its `target/` directory, so no JDK or Maven is needed.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Workspace whose launcher is `launcher` instead of `java`.
  pub fn with_launcher(launcher: &str) -> Self {
    Self::from_config(&workspace_json(launcher, None))
  }

  /// Workspace where the module named `failing` fails to build.
  pub fn with_failing_module(failing: &str) -> Self {
    Self::from_config(&workspace_json("true", Some(failing)))
  }

  fn from_config(config: &str) -> Self {
    let temp = TempDir::new().unwrap();
    for module in ["lib", "loader", "app"] {
      std::fs::create_dir_all(temp.path().join(module)).unwrap();
    }
    std::fs::write(temp.path().join("islands.json"), config).unwrap();
    Self { temp }
  }

  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn output(&self) -> PathBuf {
    self.root().join("output")
  }

  /// Write a file relative to the workspace.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Pretend every module was built already.
  pub fn write_all_artifacts(&self) {
    self.write_file("lib/target/lib-1.0.jar", "lib");
    self.write_file("loader/target/loader-1.0.jar", "loader");
    self.write_file("app/target/app-1.0.jar", "app");
  }

  /// Get a pre-configured Command for the islands binary.
  ///
  /// Clears the `ISLANDS_*` overrides so the test's `islands.json` wins.
  pub fn islands_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("islands");
    cmd.current_dir(self.temp.path());
    cmd.env("ISLANDS_WORKSPACE", self.temp.path());
    cmd.env_remove("ISLANDS_OUTPUT_DIR");
    cmd.env_remove("ISLANDS_JAVA_VERSION");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

fn workspace_json(launcher: &str, failing: Option<&str>) -> String {
  let module = |name: &str, role: &str| {
    let command = if Some(name) == failing {
      "echo compilation error >&2; exit 1".to_string()
    } else {
      format!("mkdir -p target && echo {name} > target/{name}-1.0.jar && echo built {name}")
    };
    serde_json::json!({
      "name": name,
      "dir": name,
      "artifact": format!("{name}-*.jar"),
      "role": role,
      "command": command,
    })
  };

  let config = serde_json::json!({
    "launch": { "java": launcher },
    "modules": [
      module("lib", "library"),
      module("loader", "runner"),
      module("app", "plugin"),
    ],
  });
  serde_json::to_string_pretty(&config).unwrap()
}
