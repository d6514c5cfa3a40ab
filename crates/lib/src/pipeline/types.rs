//! Types for the build/assemble/launch pipeline.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::assemble::AssemblyError;
use crate::config::BuildOptions;
use crate::java::JavaError;
use crate::process::BuildResult;
use crate::report::format_duration;

/// Where the pipeline currently is.
///
/// `Idle → Building(module) → … → Assembling → Launching → Done`, with
/// `Failed` reachable from every non-terminal stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
  Idle,
  Building(String),
  Assembling,
  Launching,
  Done,
  Failed { stage: Box<Stage>, reason: String },
}

impl Stage {
  pub fn is_terminal(&self) -> bool {
    matches!(self, Stage::Done | Stage::Failed { .. })
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stage::Idle => f.write_str("idle"),
      Stage::Building(module) => write!(f, "building({})", module),
      Stage::Assembling => f.write_str("assembling"),
      Stage::Launching => f.write_str("launching"),
      Stage::Done => f.write_str("done"),
      Stage::Failed { stage, reason } => write!(f, "failed during {}: {}", stage, reason),
    }
  }
}

/// A pipeline failure, tagged with the stage it happened in.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("build failed at stage {stage} after {}: {cause}", took(.elapsed))]
  BuildFailure {
    stage: Stage,
    module: String,
    cause: String,
    elapsed: Duration,
    /// Captured build output, if it was buffered.
    output: Option<String>,
  },

  #[error("artifact missing at stage {stage}: {source}; run 'islands build-all' first")]
  ArtifactMissing {
    stage: Stage,
    module: String,
    #[source]
    source: ArtifactError,
  },

  #[error("artifact lookup failed at stage {stage}: {source}")]
  ArtifactUnreadable {
    stage: Stage,
    module: String,
    #[source]
    source: ArtifactError,
  },

  #[error("assembly failed at stage {stage}: {source}")]
  Assembly {
    stage: Stage,
    #[source]
    source: AssemblyError,
  },

  #[error("launch failed at stage {stage}: {cause}")]
  Launch { stage: Stage, cause: String },

  #[error("Java setup failed at stage {stage}: {source}")]
  Java {
    stage: Stage,
    #[source]
    source: JavaError,
  },
}

fn took(elapsed: &Duration) -> String {
  format_duration(*elapsed)
}

impl PipelineError {
  pub fn stage(&self) -> &Stage {
    match self {
      PipelineError::BuildFailure { stage, .. }
      | PipelineError::ArtifactMissing { stage, .. }
      | PipelineError::ArtifactUnreadable { stage, .. }
      | PipelineError::Assembly { stage, .. }
      | PipelineError::Launch { stage, .. }
      | PipelineError::Java { stage, .. } => stage,
    }
  }
}

/// Results of a successful `build_all`.
#[derive(Debug, Clone)]
pub struct BuildSummary {
  pub results: Vec<BuildResult>,
  pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct LaunchOptions {
  /// Extra JVM options placed before `-jar`, whitespace separated.
  pub java_opts: Option<String>,
  /// Grace period between SIGTERM and kill after an interrupt.
  pub stop_timeout: Duration,
}

impl Default for LaunchOptions {
  fn default() -> Self {
    Self {
      java_opts: None,
      stop_timeout: Duration::from_secs(5),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  pub build: BuildOptions,
  /// Use the artifacts already on disk.
  pub skip_build: bool,
  /// Remove the output root before assembling.
  pub reset: bool,
  pub launch: LaunchOptions,
}

/// How the launched runtime ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutcome {
  pub exit_code: Option<i32>,
  pub success: bool,
  /// Stopped because the launcher received an interrupt.
  pub interrupted: bool,
}
