//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, banners, and JSON output for the read-only commands.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

pub use islands_lib::report::format_duration;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

const RULE_WIDTH: usize = 60;

pub fn print_banner(title: &str, subtitle: &str) {
  let rule = "═".repeat(RULE_WIDTH);
  println!();
  println!("{}", rule.if_supports_color(Stream::Stdout, |s| s.cyan()));
  println!("  {}", title.if_supports_color(Stream::Stdout, |s| s.bold()));
  if !subtitle.is_empty() {
    println!("  {}", subtitle.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  }
  println!("{}", rule.if_supports_color(Stream::Stdout, |s| s.cyan()));
  println!();
}

pub fn print_step(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.magenta()));
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// Captured child output, printed verbatim to stderr.
pub fn print_output(text: &str) {
  for line in text.lines() {
    eprintln!("  {}", line.if_supports_color(Stream::Stderr, |s| s.dimmed()));
  }
}

pub fn mark(ok: bool) -> String {
  if ok {
    symbols::SUCCESS
      .if_supports_color(Stream::Stdout, |s| s.green())
      .to_string()
  } else {
    symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
