//! Running build commands.
//!
//! Each module is built by handing a shell command to the platform shell in
//! the module directory. Output is either streamed straight to the console or
//! buffered and only surfaced when the command fails.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, info};

/// A command to run for one module.
#[derive(Debug, Clone)]
pub struct CommandSpec {
  pub module: String,
  pub command: String,
  pub cwd: PathBuf,
  /// Extra environment variables layered over the inherited environment.
  pub env: BTreeMap<String, OsString>,
}

/// Outcome of one build invocation.
#[derive(Debug, Clone)]
pub struct BuildResult {
  pub module: String,
  pub success: bool,
  pub duration: Duration,
  /// Combined stdout and stderr, `None` when the output was streamed.
  pub output: Option<String>,
  /// Human-readable failure cause.
  pub cause: Option<String>,
}

impl BuildResult {
  pub fn succeeded(module: &str, duration: Duration, output: Option<String>) -> Self {
    Self {
      module: module.to_string(),
      success: true,
      duration,
      output,
      cause: None,
    }
  }

  pub fn failed(module: &str, duration: Duration, cause: impl Into<String>, output: Option<String>) -> Self {
    Self {
      module: module.to_string(),
      success: false,
      duration,
      output,
      cause: Some(cause.into()),
    }
  }
}

/// Something that can run a build command.
///
/// The pipeline only talks to this trait so tests can substitute fakes.
pub trait CommandRunner {
  fn run(&self, spec: &CommandSpec, stream: bool) -> impl Future<Output = BuildResult>;
}

/// Runs commands through the platform shell.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
  /// Shell override; defaults to `/bin/sh` (Unix) or PowerShell (Windows).
  pub shell: Option<String>,
}

impl CommandRunner for SystemRunner {
  async fn run(&self, spec: &CommandSpec, stream: bool) -> BuildResult {
    let start = Instant::now();

    if !spec.cwd.is_dir() {
      return BuildResult::failed(
        &spec.module,
        start.elapsed(),
        format!("working directory does not exist: {}", spec.cwd.display()),
        None,
      );
    }

    let (shell, args) = get_shell(self.shell.as_deref());

    let mut command = Command::new(&shell);
    command
      .args(&args)
      .arg(&spec.command)
      .current_dir(&spec.cwd)
      .envs(&spec.env)
      .stdin(Stdio::null());

    info!(module = %spec.module, cmd = %spec.command, "running build command");
    debug!(shell = %shell, cwd = %spec.cwd.display(), stream, "spawning process");

    if stream {
      command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
      return match command.status().await {
        Ok(status) if status.success() => BuildResult::succeeded(&spec.module, start.elapsed(), None),
        Ok(status) => BuildResult::failed(&spec.module, start.elapsed(), describe_status(status), None),
        Err(e) => BuildResult::failed(
          &spec.module,
          start.elapsed(),
          format!("failed to launch {}: {}", shell, e),
          None,
        ),
      };
    }

    match command.output().await {
      Ok(output) => {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        if output.status.success() {
          BuildResult::succeeded(&spec.module, start.elapsed(), Some(text))
        } else {
          debug!(output = %text, "command output");
          BuildResult::failed(&spec.module, start.elapsed(), describe_status(output.status), Some(text))
        }
      }
      Err(e) => BuildResult::failed(
        &spec.module,
        start.elapsed(),
        format!("failed to launch {}: {}", shell, e),
        None,
      ),
    }
  }
}

/// Human-readable reason for a non-zero exit.
pub fn describe_status(status: ExitStatus) -> String {
  match status.code() {
    // sh reports a missing program as 127
    Some(127) => "command not found (exit code 127)".to_string(),
    Some(code) => format!("exit code {}", code),
    None => "terminated by signal".to_string(),
  }
}

/// Shell program and arguments that precede the command string.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-Command".to_string(),
      ],
    )
  }
}
