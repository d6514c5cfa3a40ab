//! The build → assemble → launch pipeline.
//!
//! Everything runs strictly in sequence. Modules are built in configuration
//! order because each one installs what the next one compiles against, and the
//! first failure stops the pipeline. Every failure carries the stage it
//! happened in, and the pipeline keeps that stage as `Stage::Failed`.

mod launch;
mod types;

pub use launch::LaunchCommand;
pub use types::*;

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::artifact::{Artifact, ArtifactError, locate_module};
use crate::assemble::{AssembleReport, assemble, clean};
use crate::config::{BuildOptions, LauncherConfig, Module};
use crate::java::{JavaEnv, Sdkman, resolve_java_env};
use crate::process::{CommandRunner, CommandSpec, describe_status};
use crate::report::{Level, Reporter, format_duration};

pub struct Pipeline<'a, R> {
  config: &'a LauncherConfig,
  runner: R,
  reporter: &'a dyn Reporter,
  sdkman: Option<Sdkman>,
  stage: Stage,
}

impl<'a, R: CommandRunner> Pipeline<'a, R> {
  pub fn new(config: &'a LauncherConfig, runner: R, reporter: &'a dyn Reporter) -> Self {
    Self {
      config,
      runner,
      reporter,
      sdkman: Sdkman::from_env(),
      stage: Stage::Idle,
    }
  }

  /// Replace the SDKMAN installation used to resolve `java_version`.
  pub fn with_sdkman(mut self, sdkman: Option<Sdkman>) -> Self {
    self.sdkman = sdkman;
    self
  }

  pub fn stage(&self) -> &Stage {
    &self.stage
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Build every module in order, stopping at the first failure.
  pub async fn build_all(&mut self, options: &BuildOptions) -> Result<BuildSummary, PipelineError> {
    let env = self.java_env()?;
    let summary = self.build_modules(options, &env).await?;
    self.stage = Stage::Done;
    Ok(summary)
  }

  /// Stage already-built artifacts into the output directory. Never builds.
  pub fn assemble(&mut self, reset: bool) -> Result<AssembleReport, PipelineError> {
    let report = self.assemble_output(reset)?;
    self.stage = Stage::Done;
    Ok(report)
  }

  /// Remove the output root. `Ok(false)` when there was nothing to remove.
  pub fn clean(&mut self) -> Result<bool, PipelineError> {
    let root = &self.config.output_dir;
    match clean(root) {
      Ok(removed) => {
        if removed {
          self
            .reporter
            .emit(Level::Success, &format!("Removed {}", root.display()));
        }
        self.stage = Stage::Done;
        Ok(removed)
      }
      Err(source) => Err(self.fail(PipelineError::Assembly {
        stage: self.stage.clone(),
        source,
      })),
    }
  }

  /// Build (unless skipped), assemble, then launch the runner and wait for it.
  pub async fn run_islands(&mut self, options: &RunOptions) -> Result<LaunchOutcome, PipelineError> {
    let env = self.java_env()?;

    if options.skip_build {
      self
        .reporter
        .emit(Level::Info, "Skipping build, using artifacts already on disk");
    } else {
      self.build_modules(&options.build, &env).await?;
    }

    let report = self.assemble_output(options.reset)?;
    let outcome = self.launch(&report.runner, &env, &options.launch).await?;
    self.stage = Stage::Done;
    Ok(outcome)
  }

  fn java_env(&mut self) -> Result<JavaEnv, PipelineError> {
    match resolve_java_env(self.config.java_version.as_deref(), self.sdkman.as_ref()) {
      Ok(env) => {
        if let Some(home) = &env.home {
          self
            .reporter
            .emit(Level::Info, &format!("Using JAVA_HOME={}", home.display()));
        }
        Ok(env)
      }
      Err(source) => Err(self.fail(PipelineError::Java {
        stage: self.stage.clone(),
        source,
      })),
    }
  }

  async fn build_modules(&mut self, options: &BuildOptions, env: &JavaEnv) -> Result<BuildSummary, PipelineError> {
    let config = self.config;
    let start = Instant::now();
    let total = config.modules.len();
    let stream = self.reporter.stream_child_output();
    let mut results = Vec::with_capacity(total);

    for (index, module) in config.modules.iter().enumerate() {
      self.stage = Stage::Building(module.name.clone());
      self
        .reporter
        .emit(Level::Step, &format!("[{}/{}] {}", index + 1, total, module.name));

      let spec = CommandSpec {
        module: module.name.clone(),
        command: config.build.command_for(module, options),
        cwd: module.dir.clone(),
        env: env.vars.clone(),
      };
      self.reporter.emit(
        Level::Info,
        &format!("Running: {}  (in {})", spec.command, module.dir.display()),
      );

      let result = self.runner.run(&spec, stream).await;

      if !result.success {
        let cause = result.cause.clone().unwrap_or_else(|| "unknown failure".to_string());
        if let Some(output) = result.output.as_deref().filter(|o| !o.trim().is_empty()) {
          self.reporter.emit(Level::Output, output);
        }
        return Err(self.fail(PipelineError::BuildFailure {
          stage: self.stage.clone(),
          module: module.name.clone(),
          cause,
          elapsed: result.duration,
          output: result.output,
        }));
      }

      self.reporter.emit(
        Level::Success,
        &format!("{} built in {}", module.name, format_duration(result.duration)),
      );

      if let Err(e) = locate_module(module) {
        self
          .reporter
          .emit(Level::Warn, &format!("Expected artifact not found after build: {}", e));
      }

      results.push(result);
    }

    let duration = start.elapsed();
    self.reporter.emit(
      Level::Success,
      &format!("All {} modules built in {}", total, format_duration(duration)),
    );
    info!(modules = total, elapsed = ?duration, "build complete");

    Ok(BuildSummary { results, duration })
  }

  fn assemble_output(&mut self, reset: bool) -> Result<AssembleReport, PipelineError> {
    let config = self.config;
    self.stage = Stage::Assembling;
    self.reporter.emit(Level::Info, "Assembling output directory");

    let runner = self.locate(config.runner())?;
    let staged = config
      .staged_modules()
      .map(|module| self.locate(module))
      .collect::<Result<Vec<_>, _>>()?;

    let layout = config.layout();
    match assemble(&layout, &runner, &staged, &config.runtime, reset) {
      Ok(report) => {
        self.reporter.emit(
          Level::Success,
          &format!(
            "Assembled {} with {} module(s)",
            layout.root.display(),
            report.staged.len()
          ),
        );
        Ok(report)
      }
      Err(source) => Err(self.fail(PipelineError::Assembly {
        stage: self.stage.clone(),
        source,
      })),
    }
  }

  fn locate(&mut self, module: &Module) -> Result<Artifact, PipelineError> {
    match locate_module(module) {
      Ok(artifact) => Ok(artifact),
      Err(source @ ArtifactError::Missing { .. }) => Err(self.fail(PipelineError::ArtifactMissing {
        stage: self.stage.clone(),
        module: module.name.clone(),
        source,
      })),
      Err(source) => Err(self.fail(PipelineError::ArtifactUnreadable {
        stage: self.stage.clone(),
        module: module.name.clone(),
        source,
      })),
    }
  }

  async fn launch(
    &mut self,
    runner: &Path,
    env: &JavaEnv,
    options: &LaunchOptions,
  ) -> Result<LaunchOutcome, PipelineError> {
    self.stage = Stage::Launching;

    if !runner.is_file() {
      return Err(self.fail(PipelineError::Launch {
        stage: self.stage.clone(),
        cause: format!("runner artifact not found: {}", runner.display()),
      }));
    }

    let command = LaunchCommand::new(self.config, runner, env, options.java_opts.as_deref());
    self.reporter.emit(Level::Info, &format!("Command: {}", command));
    self
      .reporter
      .emit(Level::Info, &format!("Working dir: {}", command.cwd.display()));
    self.reporter.emit(Level::Info, "Press Ctrl+C to stop.");

    let mut child = match command.to_command(env).spawn() {
      Ok(child) => child,
      Err(e) => {
        return Err(self.fail(PipelineError::Launch {
          stage: self.stage.clone(),
          cause: format!("failed to start {}: {}", command.program.display(), e),
        }));
      }
    };
    debug!(pid = ?child.id(), "runner started");

    let (status, interrupted) = tokio::select! {
      status = child.wait() => (status, false),
      Ok(()) = tokio::signal::ctrl_c() => {
        self.reporter.emit(Level::Warn, "Interrupt received, stopping runner");
        (launch::stop_child(&mut child, options.stop_timeout).await, true)
      }
    };

    let status = match status {
      Ok(status) => status,
      Err(e) => {
        return Err(self.fail(PipelineError::Launch {
          stage: self.stage.clone(),
          cause: format!("failed waiting for runner: {}", e),
        }));
      }
    };

    if interrupted {
      self.reporter.emit(Level::Info, "Runner stopped.");
    } else if status.success() {
      self.reporter.emit(Level::Success, "Runner exited.");
    } else {
      self
        .reporter
        .emit(Level::Warn, &format!("Runner exited with {}", describe_status(status)));
    }

    Ok(LaunchOutcome {
      exit_code: status.code(),
      success: status.success(),
      interrupted,
    })
  }

  fn fail(&mut self, err: PipelineError) -> PipelineError {
    let stage = std::mem::replace(&mut self.stage, Stage::Idle);
    self.stage = Stage::Failed {
      stage: Box::new(stage),
      reason: err.to_string(),
    };
    err
  }
}
