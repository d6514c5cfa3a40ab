//! CLI integration tests driving real child processes.

mod common;

mod assemble_tests;
mod build_tests;
mod run_tests;
