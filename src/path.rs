//! Path manipulation utilities for update-common

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Lexically normalize a path.
///
/// Collapses `.` components and resolves `..` against the preceding
/// component without touching the filesystem, so the result is valid for
/// paths that do not exist yet. A `..` at the filesystem root is dropped; a
/// leading `..` in a relative path is kept. Separators follow host
/// conventions.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    // Normal components pushed so far, i.e. how many `..` can still pop
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                result.push(component.as_os_str());
                depth = 0;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    result.pop();
                    depth -= 1;
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
        }
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Resolve a manifest-relative path against `root` and normalize it.
///
/// Manifest paths use `/` as separator on every platform. An absolute
/// `relative` replaces `root`, the way `Path::join` does.
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    let mut joined = if relative.starts_with(['/', '\\']) {
        PathBuf::from(std::path::MAIN_SEPARATOR_STR)
    } else {
        root.to_path_buf()
    };
    for part in relative.split(['/', '\\']).filter(|part| !part.is_empty()) {
        joined.push(part);
    }
    normalize(&joined)
}

/// Derive the local file name of an archive from its URL.
///
/// The name is the last path segment, without query string or fragment.
pub fn archive_file_name(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .ok_or_else(|| Error::ConfigParse {
            message: format!("archive URL '{}' does not end in a file name", url),
            hint: Some("archive URLs must point at a file, e.g. https://host/pkg.zip".to_string()),
        })
}
