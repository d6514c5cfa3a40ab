//! Locating built artifacts.
//!
//! A build leaves a version-qualified archive in the module's target
//! directory (`CoffeeLoader-1.0.0-jar-with-dependencies.jar`). The locator
//! finds it by file name glob. When several files match, the lexicographically
//! greatest file name wins, which stands in for "latest version" without
//! parsing versions.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Module;

/// A located artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  /// Absolute path of the file.
  pub path: PathBuf,
  /// Module that produced it.
  pub module: String,
}

impl Artifact {
  pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
    self.path.file_name()
  }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
  #[error("no artifact matching '{pattern}' for {module} in {}", dir.display())]
  Missing {
    module: String,
    pattern: String,
    dir: PathBuf,
  },

  #[error("invalid artifact pattern '{pattern}': {message}")]
  InvalidPattern { pattern: String, message: String },

  #[error("failed to read {}: {source}", dir.display())]
  Io {
    dir: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// All files in `dir` whose name matches `pattern`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn candidates(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, ArtifactError> {
  let glob = glob::Pattern::new(pattern).map_err(|e| ArtifactError::InvalidPattern {
    pattern: pattern.to_string(),
    message: e.to_string(),
  })?;

  if !dir.is_dir() {
    return Ok(Vec::new());
  }

  let io_err = |source| ArtifactError::Io {
    dir: dir.to_path_buf(),
    source,
  };

  let mut names = Vec::new();
  for entry in std::fs::read_dir(dir).map_err(io_err)? {
    let entry = entry.map_err(io_err)?;
    let Ok(name) = entry.file_name().into_string() else {
      continue;
    };
    if glob.matches(&name) && entry.path().is_file() {
      names.push(name);
    }
  }

  names.sort();
  Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

/// Find the single artifact matching `pattern` in `dir`.
pub fn locate(module: &str, dir: &Path, pattern: &str) -> Result<Artifact, ArtifactError> {
  let mut matches = candidates(dir, pattern)?;

  let Some(path) = matches.pop() else {
    return Err(ArtifactError::Missing {
      module: module.to_string(),
      pattern: pattern.to_string(),
      dir: dir.to_path_buf(),
    });
  };

  if !matches.is_empty() {
    let skipped: Vec<String> = matches.iter().map(|p| display_name(p)).collect();
    warn!(
      module,
      selected = %display_name(&path),
      skipped = ?skipped,
      "ambiguous artifact, using the greatest file name"
    );
  }

  debug!(module, path = %path.display(), "artifact located");

  Ok(Artifact {
    path,
    module: module.to_string(),
  })
}

/// Locate the artifact of a configured module.
pub fn locate_module(module: &Module) -> Result<Artifact, ArtifactError> {
  locate(&module.name, &module.target_dir, &module.artifact)
}

fn display_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default()
}
