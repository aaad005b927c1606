pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, ConfigCommands, DesignArgs, OutputFormat, SizeArgs};
pub use config::{load_run_config, LoggingConfig, RunConfig};
