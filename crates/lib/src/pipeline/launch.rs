//! Launching the runner artifact as a foreground process.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::config::LauncherConfig;
use crate::java::JavaEnv;

/// The fully resolved runner command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
  pub program: PathBuf,
  pub args: Vec<OsString>,
  pub cwd: PathBuf,
}

impl LaunchCommand {
  /// `<java> [java_opts…] -D<property>=<config> -jar <runner>`, run from the output root.
  pub fn new(config: &LauncherConfig, runner: &Path, env: &JavaEnv, java_opts: Option<&str>) -> Self {
    let layout = config.layout();

    let mut args: Vec<OsString> = java_opts
      .unwrap_or_default()
      .split_whitespace()
      .map(OsString::from)
      .collect();

    let mut property = OsString::from(format!("-D{}=", config.launch.config_property));
    property.push(&layout.config_path);
    args.push(property);
    args.push(OsString::from("-jar"));
    args.push(runner.as_os_str().to_os_string());

    Self {
      program: env.java_binary(&config.launch.java),
      args,
      cwd: layout.root,
    }
  }

  pub fn to_command(&self, env: &JavaEnv) -> Command {
    let mut command = Command::new(&self.program);
    command.args(&self.args).current_dir(&self.cwd).envs(&env.vars);
    command
  }
}

impl fmt::Display for LaunchCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.display())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

/// Ask the child to stop, then kill it if it has not exited within `timeout`.
pub(crate) async fn stop_child(child: &mut Child, timeout: Duration) -> io::Result<ExitStatus> {
  terminate(child);

  match tokio::time::timeout(timeout, child.wait()).await {
    Ok(status) => status,
    Err(_) => {
      warn!(timeout = ?timeout, "runner did not stop in time, killing it");
      child.kill().await?;
      child.wait().await
    }
  }
}

#[cfg(unix)]
fn terminate(child: &mut Child) {
  use rustix::process::{Pid, Signal, kill_process};

  let Some(pid) = child
    .id()
    .and_then(|id| i32::try_from(id).ok())
    .and_then(Pid::from_raw)
  else {
    return;
  };

  if let Err(e) = kill_process(pid, Signal::TERM) {
    debug!(error = %e, "failed to send SIGTERM to runner");
  }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
  if let Err(e) = child.start_kill() {
    debug!(error = %e, "failed to stop runner");
  }
}
