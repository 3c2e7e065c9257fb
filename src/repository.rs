//! # Repository Synchronizer
//!
//! This module brings each project of a [`Plan`](crate::manifest::Plan) up to
//! date. A project whose target directory already holds a clone is updated in
//! place (`fetch`, then `pull`); anything else is cloned fresh.
//!
//! ## Design
//!
//! The decision logic is separated from the git invocations through the
//! **`GitOperations`** trait. The application uses `DefaultGitOperations`,
//! which wraps the system `git` command; tests substitute a recording mock so
//! that the exact sequence of git calls can be asserted without a network.
//!
//! The clone-or-update decision is made purely from the filesystem: the
//! presence of a `.git` directory at the target path.

use std::path::Path;

use crate::error::Result;
use crate::manifest::ResolvedProject;
use crate::report::Reporter;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`.
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Fetches remote changes into an existing clone.
    fn fetch(&self, repo_dir: &Path) -> Result<()>;

    /// Fast-forwards an existing clone to its fetched upstream.
    fn pull(&self, repo_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, target_dir)
    }

    fn fetch(&self, repo_dir: &Path) -> Result<()> {
        crate::git::fetch(repo_dir)
    }

    fn pull(&self, repo_dir: &Path) -> Result<()> {
        crate::git::pull(repo_dir)
    }
}

/// What synchronizing a project does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// No clone at the target yet
    Clone,
    /// A clone exists and is fetched and fast-forwarded
    Update,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Clone => "clone",
            SyncAction::Update => "update",
        }
    }
}

/// Decide between clone and update for a project.
pub fn planned_action(project: &ResolvedProject) -> SyncAction {
    if crate::git::is_repository(&project.path) {
        SyncAction::Update
    } else {
        SyncAction::Clone
    }
}

/// Clones or updates the projects of a plan.
pub struct RepositorySynchronizer {
    git_ops: Box<dyn GitOperations>,
}

impl Default for RepositorySynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositorySynchronizer {
    /// Creates a synchronizer backed by the system `git` command.
    pub fn new() -> Self {
        Self::with_operations(Box::new(DefaultGitOperations))
    }

    /// Creates a synchronizer with a custom `GitOperations` implementation.
    pub fn with_operations(git_ops: Box<dyn GitOperations>) -> Self {
        Self { git_ops }
    }

    /// Brings one project up to date.
    ///
    /// The first failing git invocation is returned as is; nothing is
    /// cleaned up, so a partial clone stays on disk.
    pub fn sync(&self, project: &ResolvedProject, reporter: &Reporter) -> Result<SyncAction> {
        let action = planned_action(project);
        match action {
            SyncAction::Update => {
                reporter.step("Updating", project.path.display());
                self.git_ops.fetch(&project.path)?;
                self.git_ops.pull(&project.path)?;
            }
            SyncAction::Clone => {
                reporter.step(
                    "Cloning",
                    format!("{} into {}", project.name, project.path.display()),
                );
                self.git_ops.clone_repo(&project.url, &project.path)?;
            }
        }
        log::debug!("{} {} done", action.as_str(), project.name);
        Ok(action)
    }
}
