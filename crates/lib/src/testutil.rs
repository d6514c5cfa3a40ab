//! Test helpers: a scratch workspace, a fake build runner and a recording reporter.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use crate::config::{EnvOverrides, LaunchSettings, LauncherConfig, ModuleEntry, ModuleRole, WorkspaceFile};
use crate::process::{BuildResult, CommandRunner, CommandSpec};
use crate::report::{Level, Reporter};

/// A temporary workspace with three modules: `lib` (library), `loader`
/// (runner) and `app` (plugin), built in that order.
pub struct TestWorkspace {
  pub temp: TempDir,
  pub config: LauncherConfig,
}

impl TestWorkspace {
  pub fn new() -> Self {
    Self::with_launcher("java")
  }

  /// Use `program` in place of `java` when launching.
  pub fn with_launcher(program: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();

    let entry = |name: &str, role| ModuleEntry {
      name: name.to_string(),
      dir: PathBuf::from(name),
      target_dir: None,
      artifact: format!("{}-*.jar", name),
      role,
      command: None,
    };
    let modules = vec![
      entry("lib", ModuleRole::Library),
      entry("loader", ModuleRole::Runner),
      entry("app", ModuleRole::Plugin),
    ];
    for module in &modules {
      std::fs::create_dir_all(root.join(&module.dir)).unwrap();
    }

    let file = WorkspaceFile {
      modules: Some(modules),
      launch: Some(LaunchSettings {
        java: program.to_string(),
        ..Default::default()
      }),
      ..Default::default()
    };
    let config = LauncherConfig::resolve(root, file, None, EnvOverrides::default()).unwrap();

    Self { temp, config }
  }

  /// Drop an artifact named `file` into the module's target directory.
  pub fn write_artifact(&self, module: &str, file: &str) -> PathBuf {
    let module = self.config.module(module).unwrap();
    write_artifact_in(&module.target_dir, file)
  }

  /// Build every module's artifact as `<name>-1.0.jar`.
  pub fn build_everything(&self) {
    for module in &self.config.modules {
      self.write_artifact(&module.name, &format!("{}-1.0.jar", module.name));
    }
  }
}

fn write_artifact_in(target_dir: &Path, file: &str) -> PathBuf {
  std::fs::create_dir_all(target_dir).unwrap();
  let path = target_dir.join(file);
  std::fs::write(&path, file).unwrap();
  path
}

/// Runner that records calls and produces `<module>-1.0.jar` in `target/`.
#[derive(Default)]
pub struct FakeRunner {
  pub calls: Mutex<Vec<CommandSpec>>,
  pub fail_on: Option<String>,
}

impl FakeRunner {
  pub fn failing_on(module: &str) -> Self {
    Self {
      fail_on: Some(module.to_string()),
      ..Default::default()
    }
  }

  pub fn modules_run(&self) -> Vec<String> {
    self.calls.lock().unwrap().iter().map(|c| c.module.clone()).collect()
  }
}

impl CommandRunner for FakeRunner {
  async fn run(&self, spec: &CommandSpec, stream: bool) -> BuildResult {
    self.calls.lock().unwrap().push(spec.clone());
    let output = (!stream).then(|| format!("[INFO] building {}", spec.module));

    if self.fail_on.as_deref() == Some(spec.module.as_str()) {
      return BuildResult::failed(
        &spec.module,
        Duration::from_millis(5),
        "exit code 1",
        (!stream).then(|| "[ERROR] BUILD FAILURE".to_string()),
      );
    }

    write_artifact_in(&spec.cwd.join("target"), &format!("{}-1.0.jar", spec.module));
    BuildResult::succeeded(&spec.module, Duration::from_millis(5), output)
  }
}

/// Reporter that keeps every message.
#[derive(Default)]
pub struct RecordingReporter {
  pub messages: Mutex<Vec<(Level, String)>>,
  pub stream: bool,
}

impl RecordingReporter {
  pub fn contains(&self, level: Level, needle: &str) -> bool {
    self
      .messages
      .lock()
      .unwrap()
      .iter()
      .any(|(l, m)| *l == level && m.contains(needle))
  }
}

impl Reporter for RecordingReporter {
  fn emit(&self, level: Level, message: &str) {
    self.messages.lock().unwrap().push((level, message.to_string()));
  }

  fn stream_child_output(&self) -> bool {
    self.stream
  }
}
