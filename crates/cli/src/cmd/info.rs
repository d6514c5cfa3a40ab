use anyhow::Result;

use islands_lib::config::LauncherConfig;
use islands_lib::java::Sdkman;
use islands_lib::status::info;

use crate::output::{OutputFormat, mark, print_json, print_stat};

pub fn cmd_info(config: &LauncherConfig, format: OutputFormat) -> Result<()> {
  let sdkman = Sdkman::from_env();
  let report = info(config, sdkman.as_ref());

  if format.is_json() {
    return print_json(&report);
  }

  println!("Workspace:");
  print_stat("Root", &report.workspace.display().to_string());
  let file = match &report.workspace_file {
    Some(path) => path.display().to_string(),
    None => "none (using defaults)".to_string(),
  };
  print_stat("Config file", &file);
  print_stat("Build tool", &report.build_tool);
  println!();

  println!("Output:");
  print_stat("Root", &report.output_root.display().to_string());
  print_stat("Modules", &report.modules_dir.display().to_string());
  print_stat("Runtime config", &report.config_file.display().to_string());
  println!();

  println!("Java:");
  print_stat("Version", report.java_version.as_deref().unwrap_or("system default"));
  if let Some(home) = &report.java_home {
    print_stat("JAVA_HOME", &home.display().to_string());
  }
  print_stat("SDKMAN", if report.sdkman_available { "available" } else { "not found" });
  if let Some(current) = &report.sdkman_current {
    print_stat("SDKMAN current", current);
  }
  println!();

  println!("Modules:");
  for module in &report.modules {
    println!(
      "  {} {} [{}] {} ({})",
      mark(module.dir_exists),
      module.name,
      module.role,
      module.dir.display(),
      module.pattern
    );
    if let Some(command) = &module.command {
      print_stat("    command", command);
    }
  }

  Ok(())
}
