//! Implementation of the `islands assemble` command.

use anyhow::Result;

use islands_lib::config::LauncherConfig;
use islands_lib::pipeline::Pipeline;
use islands_lib::process::SystemRunner;

use crate::output::{print_stat, print_success};
use crate::reporter::ConsoleReporter;

/// Stage already-built artifacts into the output directory without building.
pub fn cmd_assemble(config: &LauncherConfig, no_clean: bool) -> Result<()> {
  let reporter = ConsoleReporter { stream: false };
  let mut pipeline = Pipeline::new(config, SystemRunner::default(), &reporter);
  let report = pipeline.assemble(!no_clean)?;

  print_success(&format!("Output assembled in {}", config.output_dir.display()));
  print_stat("Runner", &report.runner.display().to_string());
  print_stat("Modules", &report.staged.len().to_string());
  print_stat("Config", &report.config_path.display().to_string());

  Ok(())
}
