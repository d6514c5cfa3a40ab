//! Launcher configuration.
//!
//! The configuration is built once at startup from built-in defaults, the
//! optional `islands.json` workspace file and environment overrides, then
//! passed by reference to every component. Nothing reads paths from globals.

mod types;

pub use types::*;

use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::assemble::OutputLayout;
use crate::consts::{
  DEFAULT_MODULES_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_TARGET_DIR, ENV_JAVA_VERSION, ENV_OUTPUT_DIR, WORKSPACE_FILE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("workspace directory not found: {}", path.display())]
  WorkspaceNotFound {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid workspace file {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("no modules configured")]
  NoModules,

  #[error("duplicate module name: {0}")]
  DuplicateModule(String),

  #[error("expected exactly one runner module, found {0}")]
  RunnerCount(usize),

  #[error("output directory {} would remove {}; choose a directory outside the workspace sources", output.display(), protected.display())]
  UnsafeOutputDir { output: PathBuf, protected: PathBuf },

  #[error("modules_dir must be a single directory name, got '{0}'")]
  InvalidModulesDir(String),

  #[error("invalid artifact pattern '{pattern}' for module {module}: {message}")]
  InvalidPattern {
    module: String,
    pattern: String,
    message: String,
  },
}

/// On-disk shape of `islands.json`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceFile {
  /// Output root, relative to the workspace unless absolute.
  pub output_dir: Option<PathBuf>,
  /// Name of the modules subdirectory inside the output root.
  pub modules_dir: Option<String>,
  /// SDKMAN candidate identifier (e.g. `24.0.2-tem`).
  pub java_version: Option<String>,
  pub build: Option<BuildTool>,
  pub runtime: Option<RuntimeSettings>,
  pub launch: Option<LaunchSettings>,
  /// Modules in build order.
  pub modules: Option<Vec<ModuleEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
  pub name: String,
  /// Module directory, relative to the workspace unless absolute.
  pub dir: PathBuf,
  /// Artifact directory, relative to the module directory. Defaults to `target`.
  #[serde(default)]
  pub target_dir: Option<PathBuf>,
  pub artifact: String,
  pub role: ModuleRole,
  #[serde(default)]
  pub command: Option<String>,
}

impl ModuleEntry {
  fn new(name: &str, artifact: &str, role: ModuleRole) -> Self {
    Self {
      name: name.to_string(),
      dir: PathBuf::from(name),
      target_dir: None,
      artifact: artifact.to_string(),
      role,
      command: None,
    }
  }
}

/// The stock workspace: ModularKit, then CoffeeLoader, then the Islands app.
pub fn default_modules() -> Vec<ModuleEntry> {
  vec![
    ModuleEntry::new("ModularKit", "ModularKit-*.jar", ModuleRole::Library),
    ModuleEntry::new(
      "CoffeeLoader",
      "CoffeeLoader-*-jar-with-dependencies.jar",
      ModuleRole::Runner,
    ),
    ModuleEntry::new("Islands", "islands-*.jar", ModuleRole::Plugin),
  ]
}

/// Values taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
  pub output_dir: Option<PathBuf>,
  pub java_version: Option<String>,
}

impl EnvOverrides {
  pub fn from_env() -> Self {
    Self {
      output_dir: std::env::var_os(ENV_OUTPUT_DIR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from),
      java_version: std::env::var(ENV_JAVA_VERSION).ok().and_then(non_empty),
    }
  }
}

/// Resolved, validated launcher configuration.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
  pub workspace: PathBuf,
  /// The workspace file that was read, if any.
  pub workspace_file: Option<PathBuf>,
  pub output_dir: PathBuf,
  pub modules_dir_name: String,
  pub java_version: Option<String>,
  pub build: BuildTool,
  pub runtime: RuntimeSettings,
  pub launch: LaunchSettings,
  /// Modules in build order.
  pub modules: Vec<Module>,
  runner: usize,
}

impl LauncherConfig {
  /// Load the configuration for the workspace at `workspace`.
  pub fn load(workspace: &Path) -> Result<Self, ConfigError> {
    let workspace = dunce::canonicalize(workspace).map_err(|source| ConfigError::WorkspaceNotFound {
      path: workspace.to_path_buf(),
      source,
    })?;

    let file_path = workspace.join(WORKSPACE_FILE);
    let (file, workspace_file) = if file_path.is_file() {
      (read_workspace_file(&file_path)?, Some(file_path))
    } else {
      (WorkspaceFile::default(), None)
    };

    Self::resolve(workspace, file, workspace_file, EnvOverrides::from_env())
  }

  /// Merge defaults, the workspace file and environment overrides.
  ///
  /// `workspace` must already be absolute.
  pub fn resolve(
    workspace: PathBuf,
    file: WorkspaceFile,
    workspace_file: Option<PathBuf>,
    env: EnvOverrides,
  ) -> Result<Self, ConfigError> {
    let output_dir = env
      .output_dir
      .or(file.output_dir)
      .map(|p| normalize(&resolve_path(&workspace, p)))
      .unwrap_or_else(|| workspace.join(DEFAULT_OUTPUT_DIR));

    let java_version = env.java_version.or(file.java_version.and_then(non_empty));

    let modules_dir_name = file.modules_dir.unwrap_or_else(|| DEFAULT_MODULES_DIR.to_string());
    if !is_single_component(&modules_dir_name) {
      return Err(ConfigError::InvalidModulesDir(modules_dir_name));
    }

    let entries = file.modules.unwrap_or_else(default_modules);
    let modules = resolve_modules(&workspace, entries)?;
    check_output_dir(&output_dir, &workspace, &modules)?;

    let runners: Vec<usize> = modules
      .iter()
      .enumerate()
      .filter(|(_, m)| m.role == ModuleRole::Runner)
      .map(|(i, _)| i)
      .collect();
    let runner = match runners.as_slice() {
      [index] => *index,
      other => return Err(ConfigError::RunnerCount(other.len())),
    };

    let config = Self {
      workspace,
      workspace_file,
      output_dir,
      modules_dir_name,
      java_version,
      build: file.build.unwrap_or_default(),
      runtime: file.runtime.unwrap_or_default(),
      launch: file.launch.unwrap_or_default(),
      modules,
      runner,
    };

    debug!(
      workspace = %config.workspace.display(),
      output = %config.output_dir.display(),
      modules = config.modules.len(),
      "configuration resolved"
    );

    Ok(config)
  }

  /// Override the Java version, e.g. from a command-line flag.
  pub fn with_java_version(mut self, version: Option<String>) -> Self {
    if let Some(version) = version {
      self.java_version = non_empty(version);
    }
    self
  }

  pub fn layout(&self) -> OutputLayout {
    OutputLayout::new(self.output_dir.clone(), &self.modules_dir_name)
  }

  /// The module whose artifact is launched.
  pub fn runner(&self) -> &Module {
    &self.modules[self.runner]
  }

  /// Modules whose artifacts go into the modules directory.
  pub fn staged_modules(&self) -> impl Iterator<Item = &Module> {
    self.modules.iter().filter(|m| m.role.is_staged())
  }

  pub fn module(&self, name: &str) -> Option<&Module> {
    self.modules.iter().find(|m| m.name == name)
  }
}

fn read_workspace_file(path: &Path) -> Result<WorkspaceFile, ConfigError> {
  let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn resolve_modules(workspace: &Path, entries: Vec<ModuleEntry>) -> Result<Vec<Module>, ConfigError> {
  if entries.is_empty() {
    return Err(ConfigError::NoModules);
  }

  let mut seen = HashSet::new();
  let mut modules = Vec::with_capacity(entries.len());

  for entry in entries {
    if !seen.insert(entry.name.clone()) {
      return Err(ConfigError::DuplicateModule(entry.name));
    }

    glob::Pattern::new(&entry.artifact).map_err(|e| ConfigError::InvalidPattern {
      module: entry.name.clone(),
      pattern: entry.artifact.clone(),
      message: e.to_string(),
    })?;

    let dir = resolve_path(workspace, entry.dir);
    let target_dir = resolve_path(&dir, entry.target_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR)));

    modules.push(Module {
      name: entry.name,
      dir,
      target_dir,
      artifact: entry.artifact,
      role: entry.role,
      command: entry.command,
    });
  }

  Ok(modules)
}

fn resolve_path(base: &Path, path: PathBuf) -> PathBuf {
  if path.is_absolute() { path } else { base.join(path) }
}

/// The output root is removed on reset, so it must not contain the workspace
/// or any module's sources or artifacts.
fn check_output_dir(output: &Path, workspace: &Path, modules: &[Module]) -> Result<(), ConfigError> {
  let protected = std::iter::once(workspace.to_path_buf())
    .chain(modules.iter().flat_map(|m| [normalize(&m.dir), normalize(&m.target_dir)]));

  for path in protected {
    if path.starts_with(output) {
      return Err(ConfigError::UnsafeOutputDir {
        output: output.to_path_buf(),
        protected: path,
      });
    }
  }
  Ok(())
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !out.pop() {
          out.push(component);
        }
      }
      other => out.push(other),
    }
  }
  out
}

fn is_single_component(name: &str) -> bool {
  let mut components = Path::new(name).components();
  matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

fn non_empty(value: String) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}
