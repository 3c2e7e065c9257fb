//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then `use common::prelude::*;`.

use assert_fs::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{file_url, git_available, tgz_bytes, zip_bytes, TestFixture};
}

/// Build a gzip-compressed tar archive holding `entries` (path, content).
#[allow(dead_code)]
pub fn tgz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *content)
            .expect("Failed to append tar entry");
    }
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .expect("Failed to finish tgz")
}

/// Build a zip archive holding `entries` (path, content).
#[allow(dead_code)]
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        for (name, content) in entries {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .expect("Failed to start zip entry");
            writer.write_all(content).expect("Failed to write zip entry");
        }
        writer.finish().expect("Failed to finish zip");
    }
    cursor.into_inner()
}

/// `file://` URL for a local path.
#[allow(dead_code)]
pub fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path)
        .expect("Path must be absolute")
        .to_string()
}

/// Whether a usable `git` binary is on the PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// A temporary workspace with an optional `update-common.yaml`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `update-common.yaml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("update-common.yaml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a binary file with the given path and content.
    pub fn with_binary_file(self, path: &str, content: &[u8]) -> Self {
        self.temp_dir
            .child(path)
            .write_binary(content)
            .expect("Failed to write binary file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("update-common.yaml")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A command for the binary, run in the fixture directory with the
    /// environment overrides cleared and colors off.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("update-common");
        cmd.current_dir(self.path())
            .env_remove("UPDATE_COMMON_MANIFEST")
            .env_remove("UPDATE_COMMON_GIT")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    /// Install a fake `git` script that logs each invocation (working
    /// directory and arguments) to `git.log`, creates `<target>/.git` on
    /// clone, and exits with `exit_code`. Returns the script path.
    #[cfg(unix)]
    pub fn fake_git(&self, exit_code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let log = self.path().join("git.log");
        let script = format!(
            "#!/bin/sh\n\
             echo \"$PWD $*\" >> '{}'\n\
             if [ {} -ne 0 ]; then exit {}; fi\n\
             if [ \"$1\" = clone ]; then\n\
             \x20 for last; do :; done\n\
             \x20 mkdir -p \"$last/.git\"\n\
             fi\n\
             exit 0\n",
            log.display(),
            exit_code,
            exit_code
        );
        let path = self.path().join("fake-git.sh");
        std::fs::write(&path, script).expect("Failed to write fake git");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake git executable");
        path
    }

    /// Lines logged by the fake git so far.
    pub fn git_log(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join("git.log"))
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
