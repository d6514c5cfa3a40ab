//! Read-only reports over the configuration and the filesystem.
//!
//! Nothing here builds, assembles or mutates. A missing artifact is a status,
//! and unreadable directories become warnings on the affected row.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::artifact::candidates;
use crate::config::{LauncherConfig, ModuleRole};
use crate::java::Sdkman;

#[derive(Debug, Clone, Serialize)]
pub struct ModuleStatus {
  pub name: String,
  pub role: ModuleRole,
  pub pattern: String,
  pub target_dir: PathBuf,
  /// The artifact the locator would pick right now.
  pub artifact: Option<PathBuf>,
  /// How many files matched the pattern.
  pub candidates: usize,
  pub warning: Option<String>,
}

impl ModuleStatus {
  pub fn is_built(&self) -> bool {
    self.artifact.is_some()
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
  pub modules: Vec<ModuleStatus>,
  pub output_root: PathBuf,
  pub output_exists: bool,
  /// `*.jar` files anywhere under the output root.
  pub staged_jars: usize,
}

impl StatusReport {
  pub fn built_count(&self) -> usize {
    self.modules.iter().filter(|m| m.is_built()).count()
  }

  pub fn all_built(&self) -> bool {
    self.built_count() == self.modules.len()
  }
}

/// Per-module artifact status, without building anything.
pub fn status(config: &LauncherConfig) -> StatusReport {
  let modules = config
    .modules
    .iter()
    .map(|module| {
      let (artifact, count, warning) = match candidates(&module.target_dir, &module.artifact) {
        Ok(found) => {
          let warning = (found.len() > 1).then(|| format!("{} matching files, using the greatest name", found.len()));
          (found.last().cloned(), found.len(), warning)
        }
        Err(e) => (None, 0, Some(e.to_string())),
      };

      ModuleStatus {
        name: module.name.clone(),
        role: module.role,
        pattern: module.artifact.clone(),
        target_dir: module.target_dir.clone(),
        artifact,
        candidates: count,
        warning,
      }
    })
    .collect();

  let output_root = config.output_dir.clone();
  StatusReport {
    modules,
    output_exists: output_root.is_dir(),
    staged_jars: count_jars(&output_root),
    output_root,
  }
}

fn count_jars(root: &Path) -> usize {
  WalkDir::new(root)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "jar"))
    .count()
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
  pub name: String,
  pub role: ModuleRole,
  pub dir: PathBuf,
  pub dir_exists: bool,
  pub pattern: String,
  pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
  pub workspace: PathBuf,
  pub workspace_file: Option<PathBuf>,
  pub output_root: PathBuf,
  pub modules_dir: PathBuf,
  pub config_file: PathBuf,
  pub build_tool: String,
  pub java_version: Option<String>,
  /// JDK home the configured version resolves to, if it does.
  pub java_home: Option<PathBuf>,
  pub sdkman_available: bool,
  pub sdkman_current: Option<String>,
  pub modules: Vec<ModuleInfo>,
}

/// Resolved paths and Java setup.
pub fn info(config: &LauncherConfig, sdkman: Option<&Sdkman>) -> InfoReport {
  let layout = config.layout();

  let java_home = config
    .java_version
    .as_deref()
    .zip(sdkman)
    .and_then(|(version, sdkman)| sdkman.resolve(version).ok())
    .map(|candidate| candidate.home);

  InfoReport {
    workspace: config.workspace.clone(),
    workspace_file: config.workspace_file.clone(),
    output_root: layout.root,
    modules_dir: layout.modules_dir,
    config_file: layout.config_path,
    build_tool: config.build.program.clone(),
    java_version: config.java_version.clone(),
    java_home,
    sdkman_available: sdkman.is_some_and(Sdkman::is_available),
    sdkman_current: sdkman.and_then(Sdkman::current).map(|c| c.identifier),
    modules: config
      .modules
      .iter()
      .map(|m| ModuleInfo {
        name: m.name.clone(),
        role: m.role,
        dir: m.dir.clone(),
        dir_exists: m.dir.is_dir(),
        pattern: m.artifact.clone(),
        command: m.command.clone(),
      })
      .collect(),
  }
}
