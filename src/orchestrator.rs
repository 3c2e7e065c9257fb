//! # Sync Orchestration
//!
//! Runs a [`Plan`] stage by stage:
//!
//! 1.  **Repositories**: clone or update every project, in manifest order.
//! 2.  **Archives**: download and extract every archive not yet present.
//! 3.  **Placements**: copy files out of extracted archives.
//!
//! Everything runs sequentially and the first error aborts the run. In dry-run
//! mode each record is reported with the action it would take, decided by the
//! same filesystem checks, and nothing is changed.

use crate::archive::{self, ArchiveFetcher, FetchOutcome};
use crate::error::Result;
use crate::manifest::Plan;
use crate::placement::{self, PlacementOutcome};
use crate::report::Reporter;
use crate::repository::{self, RepositorySynchronizer, SyncAction};

/// Which stages to run, and whether to only report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub dry_run: bool,
    pub repositories: bool,
    pub archives: bool,
    pub placements: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            repositories: true,
            archives: true,
            placements: true,
        }
    }
}

/// Counts of what a run did (or, in dry-run mode, would do)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub cloned: usize,
    pub updated: usize,
    pub downloaded: usize,
    pub extracted: usize,
    pub archives_present: usize,
    pub copied: usize,
    pub placements_skipped: usize,
}

pub struct Orchestrator {
    synchronizer: RepositorySynchronizer,
    fetcher: ArchiveFetcher,
}

impl Orchestrator {
    pub fn new(synchronizer: RepositorySynchronizer, fetcher: ArchiveFetcher) -> Self {
        Self {
            synchronizer,
            fetcher,
        }
    }

    pub fn run(
        &self,
        plan: &Plan,
        options: &SyncOptions,
        reporter: &Reporter,
    ) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();

        if options.repositories {
            for project in &plan.projects {
                let action = if options.dry_run {
                    let action = repository::planned_action(project);
                    reporter.step(
                        "Would",
                        format!("{} {} at {}", action.as_str(), project.name, project.path.display()),
                    );
                    action
                } else {
                    self.synchronizer.sync(project, reporter)?
                };
                match action {
                    SyncAction::Clone => summary.cloned += 1,
                    SyncAction::Update => summary.updated += 1,
                }
            }
        }

        if options.archives {
            for target in &plan.archives {
                let outcome = if options.dry_run {
                    if archive::is_present(target)? {
                        FetchOutcome::AlreadyPresent
                    } else {
                        let archive_path = archive::archive_path(target)?;
                        reporter.step(
                            "Would",
                            format!("download {} into {}", target.url, archive_path.display()),
                        );
                        let name = archive_path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        match archive::ArchiveKind::from_file_name(&name) {
                            Some(kind) => FetchOutcome::Extracted(kind),
                            None => FetchOutcome::DownloadedOnly,
                        }
                    }
                } else {
                    self.fetcher.fetch(target, reporter)?
                };
                match outcome {
                    FetchOutcome::AlreadyPresent => summary.archives_present += 1,
                    FetchOutcome::Extracted(_) => {
                        summary.downloaded += 1;
                        summary.extracted += 1;
                    }
                    FetchOutcome::DownloadedOnly => summary.downloaded += 1,
                }
            }
        }

        if options.placements {
            for target in &plan.placements {
                let outcome = if options.dry_run {
                    let outcome = placement::planned(target);
                    if outcome == PlacementOutcome::Copied {
                        reporter.step(
                            "Would",
                            format!(
                                "copy {} to {}",
                                placement::source_path(target).display(),
                                placement::destination_path(target).display()
                            ),
                        );
                    }
                    outcome
                } else {
                    placement::place(target, reporter)?
                };
                match outcome {
                    PlacementOutcome::Copied => summary.copied += 1,
                    _ => summary.placements_skipped += 1,
                }
            }
        }

        Ok(summary)
    }
}
