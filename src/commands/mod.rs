//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `update-common` command-line tool. Each subcommand is defined in its own
//! file with an `Args` struct derived using `clap` and an `execute` function.
//!
//! The arguments that locate and resolve the manifest are shared by `sync` and
//! `plan` through [`ManifestArgs`].

pub mod completions;
pub mod plan;
pub mod sync;

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use update_common::defaults::MANIFEST_ENV;
use update_common::manifest::{self, Manifest, Plan};
use update_common::platform::Platform;

/// Options selecting the manifest and how it is resolved
#[derive(Args, Debug, Clone, Default)]
pub struct ManifestArgs {
    /// Path to the manifest file.
    ///
    /// Defaults to the nearest `update-common.yaml` in the current directory
    /// or one of its ancestors.
    #[arg(short, long, value_name = "FILE", env = MANIFEST_ENV)]
    pub manifest: Option<PathBuf>,

    /// Directory that manifest paths are relative to.
    ///
    /// Overrides the manifest's own `root` field.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Platform whose archives and placements are used, instead of the host's
    #[arg(long, value_enum, value_name = "PLATFORM")]
    pub platform: Option<Platform>,
}

/// A manifest loaded from disk and resolved into a plan
#[derive(Debug)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
    pub plan: Plan,
}

impl ManifestArgs {
    /// Pick the platform, then locate, parse and resolve the manifest.
    ///
    /// The platform is settled first so that an unsupported host fails
    /// before anything is read, whether or not `--platform` is given.
    pub fn load(&self) -> Result<LoadedManifest> {
        let platform = Platform::detect(self.platform)?;

        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let path = match &self.manifest {
            Some(path) => absolute(&cwd, path),
            None => manifest::find(&cwd)?,
        };
        log::debug!("using manifest {} for {}", path.display(), platform);

        let manifest = manifest::from_file(&path)
            .with_context(|| format!("Failed to load manifest from {}", path.display()))?;

        let root = match &self.root {
            Some(root) => absolute(&cwd, root),
            None => manifest::manifest_root(&path, &manifest),
        };
        let plan = manifest.resolve(platform, &root)?;

        Ok(LoadedManifest {
            path,
            manifest,
            plan,
        })
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
