//! Status command implementation.
//!
//! Shows which module artifacts exist and what the output directory holds.

use anyhow::Result;

use islands_lib::config::LauncherConfig;
use islands_lib::status::status;

use crate::output::{OutputFormat, mark, print_info, print_json, print_stat, print_success, print_warning, symbols};

pub fn cmd_status(config: &LauncherConfig, format: OutputFormat) -> Result<()> {
  let report = status(config);

  if format.is_json() {
    return print_json(&report);
  }

  println!("Modules:");
  for module in &report.modules {
    let detail = match &module.artifact {
      Some(path) => format!("{} {}", symbols::ARROW, path.display()),
      None => format!("not built ({} in {})", module.pattern, module.target_dir.display()),
    };
    println!("  {} {} [{}] {}", mark(module.is_built()), module.name, module.role, detail);
    if let Some(warning) = &module.warning {
      print_warning(&format!("{}: {}", module.name, warning));
    }
  }

  println!();
  print_stat("Output", &report.output_root.display().to_string());
  if report.output_exists {
    print_stat("Staged jars", &report.staged_jars.to_string());
  } else {
    print_stat("Staged jars", "none (not assembled)");
  }
  println!();

  if report.all_built() {
    print_success("All modules built");
  } else {
    print_info(&format!(
      "{}/{} modules built. Run 'islands build-all' to build the rest.",
      report.built_count(),
      report.modules.len()
    ));
  }

  Ok(())
}
