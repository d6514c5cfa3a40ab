use anyhow::Result;

use islands_lib::config::LauncherConfig;
use islands_lib::pipeline::Pipeline;
use islands_lib::process::SystemRunner;

use crate::output::print_info;
use crate::reporter::ConsoleReporter;

pub fn cmd_clean(config: &LauncherConfig) -> Result<()> {
  let reporter = ConsoleReporter { stream: false };
  let mut pipeline = Pipeline::new(config, SystemRunner::default(), &reporter);

  if !pipeline.clean()? {
    print_info(&format!("Nothing to clean at {}", config.output_dir.display()));
  }

  Ok(())
}
