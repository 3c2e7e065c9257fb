//! # Manifest Schema and Resolution
//!
//! This module defines the data structures that represent the dependency
//! manifest (`update-common.yaml`), the logic for reading it, and the
//! resolution step that turns it into a [`Plan`] for one host platform.
//!
//! ## Key Components
//!
//! - **`Manifest`**: The parsed file. It names the default remote and
//!   revision, the remote aliases with their URL prefixes, the ordered list of
//!   projects to clone, and the archive and placement tables.
//!
//! - **`Plan`**: The manifest resolved against a root directory and a
//!   [`Platform`]. Every project has its full clone URL and absolute target
//!   path, and archives and placements not meant for the platform are gone.
//!
//! ## Formats
//!
//! The manifest is YAML by default. Files ending in `.toml` are read as TOML
//! with the same schema.
//!
//! ```yaml
//! version: 1
//! root: ../..
//! default:
//!   remote: github
//!   revision: master
//! remotes:
//!   github: https://github.com/GPUOpen-Tools/
//! projects:
//!   - name: common-lib-amd-ADL
//!     path: Common/Lib/AMD/ADL
//! archives:
//!   - url: https://example.com/GPUPerfAPI-3.3.1078.tgz
//!     dest: Common/Lib/AMD/GPUPerfAPI
//!     platform: linux
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{self, SUPPORTED_MANIFEST_VERSION};
use crate::error::{Error, Result};
use crate::path;
use crate::platform::Platform;

/// Default remote and revision applied to projects that omit them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Remote alias used when a project does not name one.
    #[serde(default)]
    pub remote: Option<String>,
    /// Branch or revision used when a project does not name one.
    #[serde(default)]
    pub revision: Option<String>,
}

/// A git project to keep in sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Repository name, appended to the remote's URL prefix to form the
    /// clone URL.
    pub name: String,
    /// Target directory, relative to the manifest root.
    pub path: String,
    /// Remote alias; falls back to `default.remote`.
    #[serde(default)]
    pub remote: Option<String>,
    /// Branch to clone; falls back to `default.revision`.
    #[serde(default)]
    pub revision: Option<String>,
    /// Listed for completeness but never cloned or updated, typically the
    /// project that hosts the manifest itself.
    #[serde(default)]
    pub skip: bool,
}

/// A downloadable archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Archive {
    pub url: String,
    /// Directory, relative to the manifest root, that receives the download
    /// and its extracted contents.
    pub dest: String,
    /// Restrict this archive to one platform.
    #[serde(default)]
    pub platform: Option<Platform>,
}

/// A file copied out of an extracted archive into a flatter location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Placement {
    /// File name to copy.
    pub file: String,
    /// Base directory, relative to the manifest root.
    pub base: String,
    /// Destination subdirectory under `base`.
    pub subdir: String,
    /// Subdirectory under `base` holding the extracted file.
    pub source: String,
    #[serde(default)]
    pub platform: Option<Platform>,
}

fn default_version() -> u32 {
    SUPPORTED_MANIFEST_VERSION
}

/// The dependency manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Directory, relative to the manifest file, that all target paths are
    /// resolved against. Defaults to the manifest's own directory.
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub default: Defaults,
    /// Remote alias to URL prefix.
    #[serde(default)]
    pub remotes: BTreeMap<String, String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub archives: Vec<Archive>,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

/// A project with its remote and paths resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProject {
    pub name: String,
    /// Full clone string: remote prefix followed by the project name.
    pub url: String,
    pub revision: Option<String>,
    pub path: PathBuf,
}

/// An archive with its destination resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveTarget {
    pub url: String,
    pub dest: PathBuf,
}

/// A placement with its base directory resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementTarget {
    pub file: String,
    pub base: PathBuf,
    pub subdir: String,
    pub source: String,
}

/// A manifest resolved for one platform and root directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub platform: Platform,
    pub root: PathBuf,
    pub projects: Vec<ResolvedProject>,
    pub archives: Vec<ArchiveTarget>,
    pub placements: Vec<PlacementTarget>,
}

/// Parse a YAML manifest.
pub fn parse(content: &str) -> Result<Manifest> {
    let manifest: Manifest = serde_yaml::from_str(content)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Parse a TOML manifest.
pub fn parse_toml(content: &str) -> Result<Manifest> {
    let manifest: Manifest = toml::from_str(content)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Read a manifest file, choosing the format from its extension.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    log::debug!(
        "parsing manifest {} as {}",
        path.display(),
        if is_toml { "TOML" } else { "YAML" }
    );
    if is_toml {
        parse_toml(&content)
    } else {
        parse(&content)
    }
}

/// Locate the manifest by searching `start` and its ancestors.
pub fn find(start: &Path) -> Result<PathBuf> {
    let candidates = defaults::manifest_candidates(start);
    let found = candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .cloned();
    found.ok_or(Error::ManifestNotFound {
        searched: candidates,
    })
}

/// Directory a manifest's relative paths are resolved from: the manifest's
/// own directory joined with its `root` field.
pub fn manifest_root(manifest_path: &Path, manifest: &Manifest) -> PathBuf {
    let dir = manifest_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match &manifest.root {
        Some(root) => path::resolve(dir, root),
        None => path::normalize(dir),
    }
}

impl Manifest {
    /// Check the manifest for problems that can be detected without looking
    /// at the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.version == 0 || self.version > SUPPORTED_MANIFEST_VERSION {
            return Err(Error::ConfigParse {
                message: format!("unsupported manifest version {}", self.version),
                hint: Some(format!(
                    "this build understands manifest versions 1 to {}",
                    SUPPORTED_MANIFEST_VERSION
                )),
            });
        }

        if let Some(remote) = &self.default.remote {
            self.remote_prefix(remote)?;
        }

        let mut seen_paths = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: "project with an empty name".to_string(),
                    hint: None,
                });
            }
            if project.path.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("project '{}' has an empty path", project.name),
                    hint: None,
                });
            }
            if !seen_paths.insert(path::resolve(Path::new(""), &project.path)) {
                return Err(Error::ConfigParse {
                    message: format!(
                        "path '{}' is used by more than one project",
                        project.path
                    ),
                    hint: None,
                });
            }
            if let Some(remote) = &project.remote {
                self.remote_prefix(remote)?;
            } else if !project.skip && self.default.remote.is_none() {
                return Err(Error::ConfigParse {
                    message: format!("project '{}' has no remote", project.name),
                    hint: Some(
                        "set 'remote:' on the project or 'default: {remote: ...}'".to_string(),
                    ),
                });
            }
        }

        for archive in &self.archives {
            path::archive_file_name(&archive.url)?;
        }

        for placement in &self.placements {
            if placement.file.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("placement under '{}' has an empty file name", placement.base),
                    hint: None,
                });
            }
        }

        Ok(())
    }

    /// URL prefix bound to a remote alias.
    pub fn remote_prefix(&self, alias: &str) -> Result<&str> {
        self.remotes
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| Error::ConfigParse {
                message: format!("unknown remote '{}'", alias),
                hint: Some(if self.remotes.is_empty() {
                    "declare remotes under 'remotes:'".to_string()
                } else {
                    format!(
                        "declared remotes: {}",
                        self.remotes.keys().cloned().collect::<Vec<_>>().join(", ")
                    )
                }),
            })
    }

    /// Resolve the manifest for `platform`, anchoring relative paths at
    /// `root`.
    ///
    /// Skipped projects are left out, as are archives and placements
    /// restricted to another platform. Order is preserved.
    pub fn resolve(&self, platform: Platform, root: &Path) -> Result<Plan> {
        let root = path::normalize(root);
        let mut projects = Vec::new();

        for project in &self.projects {
            if project.skip {
                log::debug!("skipping project '{}' (marked skip)", project.name);
                continue;
            }

            let alias = project
                .remote
                .as_deref()
                .or(self.default.remote.as_deref())
                .ok_or_else(|| Error::ConfigParse {
                    message: format!("project '{}' has no remote", project.name),
                    hint: None,
                })?;
            let prefix = self.remote_prefix(alias)?;

            projects.push(ResolvedProject {
                name: project.name.clone(),
                url: format!("{}{}", prefix, project.name),
                revision: project
                    .revision
                    .clone()
                    .or_else(|| self.default.revision.clone()),
                path: path::resolve(&root, &project.path),
            });
        }

        let applies = |restriction: Option<Platform>| restriction.is_none_or(|p| p == platform);

        let archives = self
            .archives
            .iter()
            .filter(|archive| applies(archive.platform))
            .map(|archive| ArchiveTarget {
                url: archive.url.clone(),
                dest: path::resolve(&root, &archive.dest),
            })
            .collect();

        let placements = self
            .placements
            .iter()
            .filter(|placement| applies(placement.platform))
            .map(|placement| PlacementTarget {
                file: placement.file.clone(),
                base: path::resolve(&root, &placement.base),
                subdir: placement.subdir.clone(),
                source: placement.source.clone(),
            })
            .collect();

        Ok(Plan {
            platform,
            root,
            projects,
            archives,
            placements,
        })
    }
}
