//! Implementation of the `islands run-islands` command.
//!
//! Builds the stack (unless skipped), assembles the output directory and runs
//! the CoffeeLoader runtime in the foreground until it exits or Ctrl+C.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use islands_lib::config::{BuildOptions, LauncherConfig};
use islands_lib::pipeline::{LaunchOptions, Pipeline, RunOptions};
use islands_lib::process::SystemRunner;

use crate::output::{print_banner, print_info, print_success};
use crate::reporter::ConsoleReporter;

pub struct RunArgs {
  pub with_tests: bool,
  pub no_clean: bool,
  pub skip_build: bool,
  pub clean_build: bool,
  pub verbose: bool,
  pub java_opts: Option<String>,
  pub stop_timeout: Duration,
}

/// Run the full pipeline.
///
/// Exits 0 when the runtime exits cleanly or is stopped with Ctrl+C, and with
/// the runtime's own exit code when it fails by itself.
pub fn cmd_run_islands(config: &LauncherConfig, args: RunArgs) -> Result<ExitCode> {
  let options = RunOptions {
    build: BuildOptions {
      with_tests: args.with_tests,
      clean: args.clean_build,
      verbose: args.verbose,
    },
    skip_build: args.skip_build,
    reset: !args.no_clean,
    launch: LaunchOptions {
      java_opts: args.java_opts,
      stop_timeout: args.stop_timeout,
    },
  };

  debug!(?options, "run options");

  let subtitle = if options.skip_build {
    "fast run, skipping build".to_string()
  } else {
    format!("{} modules", config.modules.len())
  };
  print_banner("Running Islands", &subtitle);

  let reporter = ConsoleReporter { stream: args.verbose };
  let mut pipeline = Pipeline::new(config, SystemRunner::default(), &reporter);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt.block_on(pipeline.run_islands(&options))?;

  if outcome.interrupted {
    print_info("Islands stopped");
    return Ok(ExitCode::SUCCESS);
  }
  if outcome.success {
    print_success("Islands exited");
    return Ok(ExitCode::SUCCESS);
  }

  let code = outcome
    .exit_code
    .and_then(|code| u8::try_from(code).ok())
    .filter(|code| *code != 0)
    .unwrap_or(1);
  Ok(ExitCode::from(code))
}
