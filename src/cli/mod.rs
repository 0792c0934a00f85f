//! CLI module for flightdesk
//!
//! Provides command-line interface for:
//! - serve: load the schema and run the HTTP API
//! - plan: print the statement a filter payload translates to

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{plan, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_payload, write_response};
