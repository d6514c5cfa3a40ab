//! Types describing the workspace modules and how they are built.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What a module's artifact is used for at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleRole {
  /// Shared library, staged under the modules directory.
  Library,
  /// The executable artifact that gets launched from the output root.
  Runner,
  /// Dynamically loaded module, staged under the modules directory.
  Plugin,
}

impl ModuleRole {
  pub fn as_str(self) -> &'static str {
    match self {
      ModuleRole::Library => "library",
      ModuleRole::Runner => "runner",
      ModuleRole::Plugin => "plugin",
    }
  }

  /// Whether the artifact is copied into the modules directory.
  pub fn is_staged(self) -> bool {
    !matches!(self, ModuleRole::Runner)
  }
}

impl fmt::Display for ModuleRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One independently buildable unit of the workspace.
///
/// All paths are absolute once the configuration has been loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
  pub name: String,
  /// Directory the build command runs in.
  pub dir: PathBuf,
  /// Directory the build leaves its artifact in.
  pub target_dir: PathBuf,
  /// File name glob for the produced artifact.
  pub artifact: String,
  pub role: ModuleRole,
  /// Full shell command replacing the build tool invocation for this module.
  pub command: Option<String>,
}

/// Per-invocation build flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
  /// Run the module test suites instead of skipping them.
  pub with_tests: bool,
  /// Prepend the build tool's clean goal.
  pub clean: bool,
  /// Stream child output and drop the batch-mode flag.
  pub verbose: bool,
}

/// The external build tool shared by every module without a command override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildTool {
  pub program: String,
  pub goals: Vec<String>,
  pub clean_goal: Option<String>,
  pub skip_tests_arg: Option<String>,
  pub batch_mode_arg: Option<String>,
}

impl Default for BuildTool {
  fn default() -> Self {
    Self {
      program: "mvn".to_string(),
      goals: vec!["install".to_string()],
      clean_goal: Some("clean".to_string()),
      skip_tests_arg: Some("-DskipTests".to_string()),
      batch_mode_arg: Some("--batch-mode".to_string()),
    }
  }
}

impl BuildTool {
  /// Render the shell command that builds `module`.
  ///
  /// A module-level command override is returned verbatim.
  pub fn command_for(&self, module: &Module, options: &BuildOptions) -> String {
    if let Some(command) = &module.command {
      return command.clone();
    }

    let mut parts = vec![self.program.as_str()];
    parts.extend(self.clean_goal.as_deref().filter(|_| options.clean));
    parts.extend(self.goals.iter().map(String::as_str));
    parts.extend(self.skip_tests_arg.as_deref().filter(|_| !options.with_tests));
    parts.extend(self.batch_mode_arg.as_deref().filter(|_| !options.verbose));
    parts.join(" ")
  }
}

/// Settings written into the runtime configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeSettings {
  pub port: u16,
  pub file_watcher: bool,
}

impl Default for RuntimeSettings {
  fn default() -> Self {
    Self {
      port: 8080,
      file_watcher: true,
    }
  }
}

/// How the runner artifact is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchSettings {
  /// Java executable used when no JDK home is resolved.
  pub java: String,
  /// System property that receives the runtime config path.
  pub config_property: String,
}

impl Default for LaunchSettings {
  fn default() -> Self {
    Self {
      java: "java".to_string(),
      config_property: "coffeeloader.config".to_string(),
    }
  }
}
