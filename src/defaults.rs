//! Default values for update-common configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// File name of the manifest looked up when `--manifest` is not given.
pub const MANIFEST_FILE_NAME: &str = "update-common.yaml";

/// Environment variable that overrides the manifest location.
pub const MANIFEST_ENV: &str = "UPDATE_COMMON_MANIFEST";

/// Newest manifest `version` this build understands.
pub const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Name of the version-control metadata directory that marks a clone.
pub const GIT_DIR_NAME: &str = ".git";

/// Environment variable naming the git executable to run instead of `git`.
pub const GIT_PROGRAM_ENV: &str = "UPDATE_COMMON_GIT";

/// The git executable to invoke.
pub fn git_program() -> String {
    std::env::var(GIT_PROGRAM_ENV)
        .ok()
        .filter(|program| !program.trim().is_empty())
        .unwrap_or_else(|| "git".to_string())
}

/// Candidate manifest locations for a search starting at `start`.
///
/// Returns `start/update-common.yaml` followed by the same file name in each
/// ancestor directory, nearest first. This lets the tool be invoked from any
/// directory inside the workspace.
pub fn manifest_candidates(start: &Path) -> Vec<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE_NAME))
        .collect()
}
