//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use update_common::report::OutputConfig;

/// update-common - Synchronize workspace dependencies from a manifest
#[derive(Parser, Debug)]
#[command(name = "update-common")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace) [default: info, or RUST_LOG]
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone or update repositories, fetch archives and place files
    Sync(commands::sync::SyncArgs),

    /// Show what the manifest resolves to, without changing anything
    Plan(commands::plan::PlanArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level.as_deref());

        let output = OutputConfig::from_env_and_flag(&self.color);
        console::set_colors_enabled(output.use_color);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &output),
            Commands::Plan(args) => commands::plan::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Set up `env_logger`. An explicit `--log-level` wins over `RUST_LOG`.
fn init_logging(level: Option<&str>) {
    let mut builder = match level {
        Some(level) => {
            let mut builder = env_logger::Builder::new();
            builder.parse_filters(level);
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")),
    };
    builder.format_timestamp(None).format_target(false);
    // Already initialized when called twice from tests
    let _ = builder.try_init();
}
