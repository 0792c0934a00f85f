//! CLI argument definitions using clap
//!
//! Commands:
//! - flightdesk serve [--config <path>] [--database-url <url>]
//! - flightdesk plan --resource <name> --schema <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flightdesk - flight, crew and passenger search API
#[derive(Parser, Debug)]
#[command(name = "flightdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the schema from the database and serve the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Postgres connection string; overrides the config file
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: Option<String>,

        /// Port to listen on; overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Translate a filter payload read from stdin and print the SQL
    Plan {
        /// Search profile: flights, crew, crew_available, assignments, passengers
        #[arg(long)]
        resource: String,

        /// Column catalog JSON: {"table": {"column": "data_type"}}
        #[arg(long)]
        schema: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
