//! Reporting capability handed to the pipeline.
//!
//! The pipeline never prints. It emits leveled messages through a `Reporter`,
//! and the binary decides how they are rendered.

use std::time::Duration;

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  /// Progress marker such as `[2/3] CoffeeLoader`.
  Step,
  Info,
  Success,
  Warn,
  Error,
  /// Raw output captured from a child process.
  Output,
}

pub trait Reporter {
  fn emit(&self, level: Level, message: &str);

  /// Whether child processes write straight to the console.
  fn stream_child_output(&self) -> bool;
}

/// Reporter that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter {
  pub stream: bool,
}

impl Reporter for TracingReporter {
  fn emit(&self, level: Level, message: &str) {
    match level {
      Level::Step | Level::Info | Level::Success => info!("{}", message),
      Level::Warn => warn!("{}", message),
      Level::Error => error!("{}", message),
      Level::Output => info!(output = %message, "child output"),
    }
  }

  fn stream_child_output(&self) -> bool {
    self.stream
  }
}

/// Compact elapsed time: `850ms`, `12.40s`, `3m 5s`.
pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}
