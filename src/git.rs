//! Invocations of the system `git` client.
//!
//! Using the system git command means SSH keys, credential helpers and any
//! other authentication configured in `~/.gitconfig` just work. Git's own
//! output is streamed straight to the console; only the exit status is
//! inspected.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::defaults::{self, GIT_DIR_NAME};
use crate::error::{Error, Result};

/// Whether `path` holds a clone, i.e. has a `.git` directory.
pub fn is_repository(path: &Path) -> bool {
    path.join(GIT_DIR_NAME).is_dir()
}

/// Clone `url` into `target_dir` without tags.
///
/// The clone checks out the remote's default branch. A failure is reported
/// against `target_dir`, since the command itself runs in the current
/// directory.
pub fn clone(url: &str, target_dir: &Path) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let args = [
        "clone".to_string(),
        "--no-tags".to_string(),
        url.to_string(),
        target_dir.to_string_lossy().into_owned(),
    ];
    run(&args, None).map_err(|err| match err {
        Error::GitCommand { command, code, .. } => Error::GitCommand {
            command,
            dir: target_dir.to_path_buf(),
            code,
        },
        other => other,
    })
}

/// Fetch remote changes into the clone at `repo_dir`.
pub fn fetch(repo_dir: &Path) -> Result<()> {
    run(&["fetch".to_string()], Some(repo_dir))
}

/// Merge the fetched upstream into the checked-out branch, without tags.
pub fn pull(repo_dir: &Path) -> Result<()> {
    run(&["pull".to_string(), "--no-tags".to_string()], Some(repo_dir))
}

fn run(args: &[String], cwd: Option<&Path>) -> Result<()> {
    let program = defaults::git_program();
    let command_line = args.join(" ");
    log::debug!(
        "running '{} {}' in {}",
        program,
        command_line,
        cwd.map(|dir| dir.display().to_string())
            .unwrap_or_else(|| ".".to_string())
    );

    let mut command = Command::new(&program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    // Keep our own progress lines ordered with git's output
    let _ = std::io::stdout().flush();
    let status = command.status().map_err(|e| Error::GitSpawn {
        command: command_line.clone(),
        message: e.to_string(),
    })?;
    let _ = std::io::stdout().flush();

    if status.success() {
        Ok(())
    } else {
        Err(Error::GitCommand {
            command: args.first().cloned().unwrap_or_default(),
            dir: cwd
                .map(Path::to_path_buf)
                .unwrap_or_else(|| Path::new(".").to_path_buf()),
            code: status.code(),
        })
    }
}
