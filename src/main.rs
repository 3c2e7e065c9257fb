//! # update-common CLI
//!
//! This is the binary entry point for the `update-common` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Translating errors into a message on stderr and the matching exit code.
//!   A failing git command makes the process exit with git's own code.
//!
//! The core application logic lives in the `update_common` library crate.

mod cli;
mod commands;

use clap::Parser;
use update_common::error::Error;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = cli.execute() {
        eprintln!("Error: {:#}", err);
        let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
        std::process::exit(code);
    }
}
