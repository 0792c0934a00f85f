//! flightdesk CLI entry point
//!
//! Parses arguments, dispatches, prints errors to stderr and exits
//! non-zero on failure. All logic lives in the CLI module.

use flightdesk::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
