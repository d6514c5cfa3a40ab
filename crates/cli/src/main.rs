mod cmd;
mod output;
mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use islands_lib::config::LauncherConfig;

use crate::output::{OutputFormat, print_error};

/// Build and run the Islands stack: ModularKit, CoffeeLoader and the Islands plugin.
#[derive(Parser)]
#[command(name = "islands")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Workspace root containing the module directories
  #[arg(short = 'w', long, global = true, env = "ISLANDS_WORKSPACE", default_value = ".")]
  workspace: PathBuf,

  /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
  #[arg(long, global = true, default_value = "warn")]
  log_level: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every module in order
  BuildAll {
    /// Run the test phase instead of skipping it
    #[arg(long)]
    with_tests: bool,

    /// Run the clean goal before building
    #[arg(long)]
    clean: bool,

    /// Stream build tool output to the terminal
    #[arg(short, long)]
    verbose: bool,

    /// SDKMAN Java identifier to build with, e.g. 21.0.2-tem
    #[arg(long)]
    java_version: Option<String>,
  },

  /// Build, assemble the output directory and launch the runtime
  RunIslands {
    /// Run the test phase instead of skipping it
    #[arg(long)]
    with_tests: bool,

    /// Keep the existing output directory instead of recreating it
    #[arg(long)]
    no_clean: bool,

    /// Skip the build and use artifacts already on disk
    #[arg(long, alias = "fast-build")]
    skip_build: bool,

    /// Run the clean goal before building
    #[arg(long)]
    clean_build: bool,

    /// Stream build tool output to the terminal
    #[arg(short, long)]
    verbose: bool,

    /// Extra JVM options passed before -jar
    #[arg(long, allow_hyphen_values = true)]
    java_opts: Option<String>,

    /// SDKMAN Java identifier to build and run with
    #[arg(long)]
    java_version: Option<String>,

    /// How long to wait for the runtime to stop after Ctrl+C (e.g. "5s")
    #[arg(long, value_parser = humantime::parse_duration, default_value = "5s")]
    stop_timeout: Duration,
  },

  /// Stage already-built artifacts into the output directory
  Assemble {
    /// Keep the existing output directory instead of recreating it
    #[arg(long)]
    no_clean: bool,
  },

  /// Remove the output directory
  Clean,

  /// Show which module artifacts are built and what is staged
  Status {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show the resolved workspace configuration and Java setup
  Info {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<ExitCode> {
  let config = LauncherConfig::load(&cli.workspace)
    .with_context(|| format!("Failed to load workspace {}", cli.workspace.display()))?;

  match cli.command {
    Commands::BuildAll {
      with_tests,
      clean,
      verbose,
      java_version,
    } => {
      let config = config.with_java_version(java_version);
      cmd::cmd_build_all(&config, with_tests, clean, verbose)?;
    }
    Commands::RunIslands {
      with_tests,
      no_clean,
      skip_build,
      clean_build,
      verbose,
      java_opts,
      java_version,
      stop_timeout,
    } => {
      let config = config.with_java_version(java_version);
      let args = cmd::RunArgs {
        with_tests,
        no_clean,
        skip_build,
        clean_build,
        verbose,
        java_opts,
        stop_timeout,
      };
      return cmd::cmd_run_islands(&config, args);
    }
    Commands::Assemble { no_clean } => {
      cmd::cmd_assemble(&config, no_clean)?;
    }
    Commands::Clean => {
      cmd::cmd_clean(&config)?;
    }
    Commands::Status { output } => {
      cmd::cmd_status(&config, output)?;
    }
    Commands::Info { output } => {
      cmd::cmd_info(&config, output)?;
    }
  }

  Ok(ExitCode::SUCCESS)
}
