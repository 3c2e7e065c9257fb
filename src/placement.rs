//! # File Placement
//!
//! Some archives bury the files a build needs several directories deep. A
//! placement copies one such file from `base/source/file` to
//! `base/subdir/file`, once. An existing destination is never overwritten and
//! a missing source is not an error: the archive may simply not ship that
//! file on this platform.

use std::fs::{self, FileTimes, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::PlacementTarget;
use crate::path;
use crate::report::Reporter;

/// Result of processing one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Source was copied to the destination
    Copied,
    /// Destination already existed; nothing was done
    DestinationExists,
    /// Neither file existed; nothing was done
    SourceMissing,
}

impl PlacementOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementOutcome::Copied => "copy",
            PlacementOutcome::DestinationExists => "present",
            PlacementOutcome::SourceMissing => "no source",
        }
    }
}

/// `base/source/file`
pub fn source_path(target: &PlacementTarget) -> PathBuf {
    path::resolve(&target.base, &target.source).join(&target.file)
}

/// `base/subdir`
pub fn destination_dir(target: &PlacementTarget) -> PathBuf {
    path::resolve(&target.base, &target.subdir)
}

/// `base/subdir/file`
pub fn destination_path(target: &PlacementTarget) -> PathBuf {
    destination_dir(target).join(&target.file)
}

/// What [`place`] would do, judged from the filesystem only.
pub fn planned(target: &PlacementTarget) -> PlacementOutcome {
    if destination_path(target).is_file() {
        PlacementOutcome::DestinationExists
    } else if source_path(target).is_file() {
        PlacementOutcome::Copied
    } else {
        PlacementOutcome::SourceMissing
    }
}

/// Copy the file of `target` into place if it is not there yet.
///
/// The destination directory is created even when nothing is copied.
pub fn place(target: &PlacementTarget, reporter: &Reporter) -> Result<PlacementOutcome> {
    fs::create_dir_all(destination_dir(target))?;

    let outcome = planned(target);
    if outcome == PlacementOutcome::Copied {
        let source = source_path(target);
        let destination = destination_path(target);
        reporter.step(
            "Copying",
            format!("{} to {}", source.display(), destination.display()),
        );
        copy_preserving_metadata(&source, &destination)?;
    } else {
        log::debug!("placement of {}: {}", target.file, outcome.as_str());
    }
    Ok(outcome)
}

/// Copy contents and permissions, then carry over access and modification
/// times.
fn copy_preserving_metadata(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination)?;

    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    // The copied permissions may be read-only
    let file = OpenOptions::new()
        .write(true)
        .open(destination)
        .or_else(|_| fs::File::open(destination))?;
    file.set_times(times)?;
    Ok(())
}
