//! Console rendering of pipeline messages.

use islands_lib::report::{Level, Reporter};

use crate::output::{print_error, print_info, print_output, print_step, print_success, print_warning};

/// Renders pipeline messages with the CLI's colored output helpers.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
  /// Let build tools write directly to the terminal.
  pub stream: bool,
}

impl Reporter for ConsoleReporter {
  fn emit(&self, level: Level, message: &str) {
    match level {
      Level::Step => print_step(message),
      Level::Info => print_info(message),
      Level::Success => print_success(message),
      Level::Warn => print_warning(message),
      Level::Error => print_error(message),
      Level::Output => print_output(message),
    }
  }

  fn stream_child_output(&self) -> bool {
    self.stream
  }
}
