mod assemble;
mod build_all;
mod clean;
mod info;
mod run_islands;
mod status;

pub use assemble::cmd_assemble;
pub use build_all::cmd_build_all;
pub use clean::cmd_clean;
pub use info::cmd_info;
pub use run_islands::{RunArgs, cmd_run_islands};
pub use status::cmd_status;
