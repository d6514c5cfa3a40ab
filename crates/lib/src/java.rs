//! JDK selection through a local SDKMAN installation.
//!
//! Only lookup is done here. Installing or switching candidates is left to
//! the `sdk` tool itself.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::ENV_SDKMAN_DIR;

#[derive(Debug, Error)]
pub enum JavaError {
  #[error("Java {identifier} is not installed; install it with 'sdk install java {identifier}'")]
  NotInstalled { identifier: String },

  #[error("Java {identifier} was requested but SDKMAN was not found")]
  SdkmanUnavailable { identifier: String },

  #[error("failed to build PATH for {}: {message}", home.display())]
  Path { home: PathBuf, message: String },
}

/// An installed Java candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaCandidate {
  pub identifier: String,
  pub home: PathBuf,
}

/// A local SDKMAN installation.
#[derive(Debug, Clone)]
pub struct Sdkman {
  root: PathBuf,
}

impl Sdkman {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// `$SDKMAN_DIR`, falling back to `~/.sdkman`.
  pub fn from_env() -> Option<Self> {
    if let Some(dir) = std::env::var_os(ENV_SDKMAN_DIR).filter(|d| !d.is_empty()) {
      return Some(Self::new(dir));
    }
    home_dir().map(|home| Self::new(home.join(".sdkman")))
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn is_available(&self) -> bool {
    self.root.join("bin").join("sdkman-init.sh").is_file()
  }

  fn candidates_dir(&self) -> PathBuf {
    self.root.join("candidates").join("java")
  }

  /// Installed candidates sorted by identifier, excluding `current`.
  pub fn installed(&self) -> Vec<JavaCandidate> {
    let Ok(entries) = std::fs::read_dir(self.candidates_dir()) else {
      return Vec::new();
    };

    let mut candidates: Vec<JavaCandidate> = entries
      .filter_map(Result::ok)
      .filter_map(|entry| {
        let identifier = entry.file_name().into_string().ok()?;
        if identifier == "current" || !entry.path().is_dir() {
          return None;
        }
        let path = entry.path();
        Some(JavaCandidate {
          identifier,
          home: dunce::canonicalize(&path).unwrap_or(path),
        })
      })
      .collect();

    candidates.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    candidates
  }

  /// The candidate `current` points at.
  pub fn current(&self) -> Option<JavaCandidate> {
    let home = dunce::canonicalize(self.candidates_dir().join("current")).ok()?;
    let identifier = home.file_name()?.to_str()?.to_string();
    Some(JavaCandidate { identifier, home })
  }

  /// Resolve an identifier, exact match first, then prefix (`24` finds `24.0.2-tem`).
  pub fn resolve(&self, identifier: &str) -> Result<JavaCandidate, JavaError> {
    let installed = self.installed();

    installed
      .iter()
      .find(|c| c.identifier == identifier)
      .or_else(|| installed.iter().find(|c| c.identifier.starts_with(identifier)))
      .cloned()
      .ok_or_else(|| JavaError::NotInstalled {
        identifier: identifier.to_string(),
      })
  }
}

/// Environment used for builds and the launched runtime.
#[derive(Debug, Clone, Default)]
pub struct JavaEnv {
  /// `None` means the ambient `java` on PATH.
  pub home: Option<PathBuf>,
  pub vars: BTreeMap<String, OsString>,
}

impl JavaEnv {
  pub fn ambient() -> Self {
    Self::default()
  }

  /// `JAVA_HOME=<home>` and `<home>/bin` prepended to the current PATH.
  pub fn for_home(home: &Path) -> Result<Self, JavaError> {
    let bin = home.join("bin");
    let current = std::env::var_os("PATH").unwrap_or_default();
    let path = std::env::join_paths(std::iter::once(bin).chain(std::env::split_paths(&current))).map_err(|e| {
      JavaError::Path {
        home: home.to_path_buf(),
        message: e.to_string(),
      }
    })?;

    let mut vars = BTreeMap::new();
    vars.insert("JAVA_HOME".to_string(), home.as_os_str().to_os_string());
    vars.insert("PATH".to_string(), path);

    Ok(Self {
      home: Some(home.to_path_buf()),
      vars,
    })
  }

  /// Java executable to launch: `<home>/bin/java` when present, else `fallback`.
  pub fn java_binary(&self, fallback: &str) -> PathBuf {
    self
      .home
      .as_ref()
      .map(|home| home.join("bin").join(java_exe()))
      .filter(|bin| bin.is_file())
      .unwrap_or_else(|| PathBuf::from(fallback))
  }
}

/// Pick the JDK for `version`, or the ambient one when no version is configured.
pub fn resolve_java_env(version: Option<&str>, sdkman: Option<&Sdkman>) -> Result<JavaEnv, JavaError> {
  let Some(identifier) = version else {
    debug!("no Java version configured, using ambient java");
    return Ok(JavaEnv::ambient());
  };

  let sdkman = sdkman.ok_or_else(|| JavaError::SdkmanUnavailable {
    identifier: identifier.to_string(),
  })?;

  let candidate = sdkman.resolve(identifier)?;
  info!(identifier = %candidate.identifier, home = %candidate.home.display(), "using Java");
  JavaEnv::for_home(&candidate.home)
}

fn java_exe() -> &'static str {
  if cfg!(windows) { "java.exe" } else { "java" }
}

fn home_dir() -> Option<PathBuf> {
  let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
  std::env::var_os(var).filter(|h| !h.is_empty()).map(PathBuf::from)
}
