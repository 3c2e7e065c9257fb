//! # update-common
//!
//! This library keeps a multi-repository workspace in step with a dependency
//! manifest. It is used by the `update-common` command-line tool but can be
//! driven directly by other applications.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use update_common::manifest;
//! use update_common::platform::Platform;
//!
//! let manifest = manifest::parse(r#"
//! default:
//!   remote: github
//! remotes:
//!   github: https://github.com/GPUOpen-Tools/
//! projects:
//!   - name: common-lib-amd-ADL
//!     path: Common/Lib/AMD/ADL
//! "#).unwrap();
//!
//! let plan = manifest.resolve(Platform::Linux, Path::new("/work")).unwrap();
//! assert_eq!(plan.projects[0].url, "https://github.com/GPUOpen-Tools/common-lib-amd-ADL");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: remotes, projects, archives and placements,
//!   read from YAML or TOML and resolved into a `Plan` for one platform.
//! - **Repositories (`repository`, `git`)**: clone a project when its target
//!   has no `.git` directory, otherwise fetch and pull it.
//! - **Archives (`archive`, `download`)**: download each archive once and
//!   extract zip and gzip-tar files next to it.
//! - **Placements (`placement`)**: copy individual files out of extracted
//!   archives into the location a build expects.
//! - **Orchestration (`orchestrator`)**: run the three stages in order,
//!   stopping at the first failure.

pub mod archive;
pub mod defaults;
pub mod download;
pub mod error;
pub mod git;
pub mod manifest;
pub mod orchestrator;
pub mod path;
pub mod placement;
pub mod platform;
pub mod report;
pub mod repository;

#[cfg(test)]
mod path_proptest;
