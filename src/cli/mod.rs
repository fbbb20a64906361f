mod commands;
mod context;
mod help;
pub mod output;
mod registry;
pub mod report;
mod shell;

pub use context::{CliMode, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
