//! Assembling the runtime output directory.
//!
//! Layout produced under the output root:
//!
//! ```text
//! output/
//!   CoffeeLoader-1.0.0-jar-with-dependencies.jar   (runner)
//!   config.json                                    (runtime config)
//!   modules/
//!     ModularKit-1.8.3.jar                         (library)
//!     islands-0.0.1-SNAPSHOT.jar                   (plugin)
//! ```
//!
//! The runtime config is written last and only after every copy succeeded.
//! A failed assemble may leave copied jars behind but never a config that
//! points at an incomplete modules directory.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::config::RuntimeSettings;
use crate::consts::RUNTIME_CONFIG_FILE;

#[derive(Debug, Error)]
pub enum AssemblyError {
  #[error("failed to remove {}: {source}", path.display())]
  Reset {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to create {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{first} and {second} both produce {name}; staged artifacts need distinct file names")]
  DuplicateArtifact { name: String, first: String, second: String },

  #[error("artifact path has no file name: {}", path.display())]
  InvalidArtifact { path: PathBuf },

  #[error("failed to write {}: {source}", path.display())]
  WriteConfig {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  ReadConfig {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid runtime config {}: {source}", path.display())]
  ParseConfig {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Paths of the runtime output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLayout {
  pub root: PathBuf,
  pub modules_dir: PathBuf,
  pub config_path: PathBuf,
}

impl OutputLayout {
  pub fn new(root: PathBuf, modules_dir_name: &str) -> Self {
    Self {
      modules_dir: root.join(modules_dir_name),
      config_path: root.join(RUNTIME_CONFIG_FILE),
      root,
    }
  }
}

/// The file the launched runtime reads to discover plugin directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
  pub port: u16,
  pub file_watcher: bool,
  pub sources: Vec<PathBuf>,
}

impl RuntimeConfig {
  pub fn load(path: &Path) -> Result<Self, AssemblyError> {
    let content = std::fs::read_to_string(path).map_err(|source| AssemblyError::ReadConfig {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| AssemblyError::ParseConfig {
      path: path.to_path_buf(),
      source,
    })
  }

  fn write(&self, path: &Path) -> Result<(), AssemblyError> {
    let write_err = |source| AssemblyError::WriteConfig {
      path: path.to_path_buf(),
      source,
    };
    let json = serde_json::to_string_pretty(self).map_err(|e| write_err(io::Error::other(e)))?;
    std::fs::write(path, json + "\n").map_err(write_err)
  }
}

/// What an assemble call produced.
#[derive(Debug, Clone, Serialize)]
pub struct AssembleReport {
  pub runner: PathBuf,
  pub staged: Vec<PathBuf>,
  pub config_path: PathBuf,
  pub reset: bool,
}

/// Stage `runner` and `staged` into `layout` and write the runtime config.
///
/// With `reset`, the output root is removed first. Without it, unrelated files
/// in the output root survive and only the staged paths are overwritten.
pub fn assemble(
  layout: &OutputLayout,
  runner: &Artifact,
  staged: &[Artifact],
  runtime: &RuntimeSettings,
  reset: bool,
) -> Result<AssembleReport, AssemblyError> {
  check_distinct(staged)?;

  if reset && clean(&layout.root)? {
    info!(path = %layout.root.display(), "output directory reset");
  }

  create_dir(&layout.root)?;
  create_dir(&layout.modules_dir)?;

  let runner_dest = layout.root.join(file_name(runner)?);
  copy_atomic(&runner.path, &runner_dest)?;

  let mut staged_paths = Vec::with_capacity(staged.len());
  for artifact in staged {
    let dest = layout.modules_dir.join(file_name(artifact)?);
    copy_atomic(&artifact.path, &dest)?;
    staged_paths.push(dest);
  }

  let modules_dir = std::path::absolute(&layout.modules_dir).map_err(|source| AssemblyError::CreateDir {
    path: layout.modules_dir.clone(),
    source,
  })?;
  let config = RuntimeConfig {
    port: runtime.port,
    file_watcher: runtime.file_watcher,
    sources: vec![modules_dir],
  };
  config.write(&layout.config_path)?;
  info!(path = %layout.config_path.display(), "runtime config written");

  Ok(AssembleReport {
    runner: runner_dest,
    staged: staged_paths,
    config_path: layout.config_path.clone(),
    reset,
  })
}

/// Remove the output root. Returns `false` if there was nothing to remove.
pub fn clean(root: &Path) -> Result<bool, AssemblyError> {
  match std::fs::remove_dir_all(root) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(source) => Err(AssemblyError::Reset {
      path: root.to_path_buf(),
      source,
    }),
  }
}

fn check_distinct(staged: &[Artifact]) -> Result<(), AssemblyError> {
  let mut seen: HashMap<&std::ffi::OsStr, &str> = HashMap::new();
  for artifact in staged {
    let name = file_name(artifact)?;
    if let Some(first) = seen.insert(name, &artifact.module) {
      return Err(AssemblyError::DuplicateArtifact {
        name: name.to_string_lossy().into_owned(),
        first: first.to_string(),
        second: artifact.module.clone(),
      });
    }
  }
  Ok(())
}

fn create_dir(path: &Path) -> Result<(), AssemblyError> {
  std::fs::create_dir_all(path).map_err(|source| AssemblyError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

fn file_name(artifact: &Artifact) -> Result<&std::ffi::OsStr, AssemblyError> {
  artifact.file_name().ok_or_else(|| AssemblyError::InvalidArtifact {
    path: artifact.path.clone(),
  })
}

/// Copy through a sibling temp file and rename it into place, so a watcher on
/// the destination never sees a half-written jar.
fn copy_atomic(from: &Path, to: &Path) -> Result<(), AssemblyError> {
  let copy_err = |source| AssemblyError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  };

  let dir = to.parent().unwrap_or_else(|| Path::new("."));
  let prefix = format!(
    ".{}~",
    to.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
  );
  let tmp = tempfile::Builder::new()
    .prefix(&prefix)
    .tempfile_in(dir)
    .map_err(copy_err)?;

  std::fs::copy(from, tmp.path()).map_err(copy_err)?;
  tmp.persist(to).map_err(|e| copy_err(e.error))?;

  debug!(from = %from.display(), to = %to.display(), "artifact copied");
  Ok(())
}
