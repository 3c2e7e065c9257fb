//! # Sync Command Implementation
//!
//! This module implements the `sync` subcommand, the main job of the tool:
//!
//! 1.  Clone every project that has no clone yet, update the others.
//! 2.  Download and extract every archive not downloaded before.
//! 3.  Copy placement files out of the extracted archives.
//!
//! The first failure stops the run. A failing git command ends the process
//! with git's own exit code.

use anyhow::Result;
use clap::Args;
use std::time::Instant;

use update_common::archive::ArchiveFetcher;
use update_common::download::HttpDownloader;
use update_common::orchestrator::{Orchestrator, SyncOptions};
use update_common::report::{emoji, OutputConfig, Reporter};
use update_common::repository::RepositorySynchronizer;

use super::ManifestArgs;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not clone or update repositories
    #[arg(long)]
    pub skip_repos: bool,

    /// Do not download archives
    #[arg(long)]
    pub skip_archives: bool,

    /// Do not copy placement files
    #[arg(long)]
    pub skip_placements: bool,
}

/// Execute the sync command
pub fn execute(args: SyncArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let reporter = Reporter::new(output.clone(), args.quiet);

    let loaded = args.manifest.load()?;

    if args.dry_run {
        reporter.line(format!(
            "{} DRY RUN MODE - No changes will be made",
            emoji(output, "🔎", "[DRY RUN]")
        ));
    }
    reporter.line(format!(
        "Syncing {} ({}) into {}",
        loaded.path.display(),
        loaded.plan.platform,
        loaded.plan.root.display()
    ));

    let orchestrator = Orchestrator::new(
        RepositorySynchronizer::new(),
        ArchiveFetcher::new(Box::new(HttpDownloader::new(reporter.show_progress())?)),
    );
    let options = SyncOptions {
        dry_run: args.dry_run,
        repositories: !args.skip_repos,
        archives: !args.skip_archives,
        placements: !args.skip_placements,
    };

    let summary = orchestrator.run(&loaded.plan, &options, &reporter)?;

    reporter.line(format!(
        "{} {} in {:.2}s",
        emoji(output, "✅", "[OK]"),
        if args.dry_run { "Dry run finished" } else { "Synchronized" },
        start_time.elapsed().as_secs_f64()
    ));
    reporter.line(format!(
        "   {} cloned, {} updated, {} downloaded ({} extracted), {} already present, {} copied",
        summary.cloned,
        summary.updated,
        summary.downloaded,
        summary.extracted,
        summary.archives_present,
        summary.copied
    ));

    Ok(())
}
