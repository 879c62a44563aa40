//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod logging;
mod version;

pub use commands::{
    ConfigSubcommand, OutputFormat, QueryCommand, handle_config_command, handle_query_command,
};
pub use logging::*;
pub use version::display_version;
