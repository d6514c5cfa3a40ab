//! Implementation of the `islands build-all` command.

use anyhow::{Context, Result};

use islands_lib::config::{BuildOptions, LauncherConfig};
use islands_lib::pipeline::Pipeline;
use islands_lib::process::SystemRunner;

use crate::output::{format_duration, print_banner, print_stat};
use crate::reporter::ConsoleReporter;

/// Build every configured module in order, stopping at the first failure.
pub fn cmd_build_all(config: &LauncherConfig, with_tests: bool, clean: bool, verbose: bool) -> Result<()> {
  let options = BuildOptions {
    with_tests,
    clean,
    verbose,
  };

  print_banner(
    "Building Islands stack",
    &format!("{} modules in {}", config.modules.len(), config.workspace.display()),
  );

  let reporter = ConsoleReporter { stream: verbose };
  let mut pipeline = Pipeline::new(config, SystemRunner::default(), &reporter);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let summary = rt.block_on(pipeline.build_all(&options))?;

  println!();
  for result in &summary.results {
    print_stat(&result.module, &format_duration(result.duration));
  }

  Ok(())
}
