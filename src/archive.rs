//! # Archive Fetcher
//!
//! Downloads archives into their destination directories and extracts them.
//!
//! An archive is fetched at most once: the downloaded file itself, kept next
//! to its extracted contents, marks it as done. Whether a previous extraction
//! completed is not checked.
//!
//! Zip files are extracted with `zip`, `.tgz` and `.tar.gz` files with
//! `flate2` and `tar`. Files with any other extension are downloaded and left
//! as they are.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use zip::ZipArchive;

use crate::download::Downloader;
use crate::error::{Error, Result};
use crate::manifest::ArchiveTarget;
use crate::path;
use crate::report::Reporter;

/// Container formats that can be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    /// Detect the format from a file name, `None` for anything unsupported.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".tgz") || name.ends_with(".tar.gz") {
            Some(ArchiveKind::TarGz)
        } else {
            None
        }
    }
}

/// Unpack `archive` into `dest`.
pub fn extract(archive: &Path, dest: &Path, kind: ArchiveKind) -> Result<()> {
    let file = File::open(archive)?;
    match kind {
        ArchiveKind::TarGz => {
            let decoder = GzDecoder::new(file);
            let mut tar = Archive::new(decoder);
            tar.unpack(dest).map_err(|e| archive_error(archive, e))?;
        }
        ArchiveKind::Zip => {
            let mut zip = ZipArchive::new(file).map_err(|e| archive_error(archive, e))?;
            zip.extract(dest).map_err(|e| archive_error(archive, e))?;
        }
    }
    Ok(())
}

fn archive_error(path: &Path, error: impl std::fmt::Display) -> Error {
    Error::Archive {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

/// Local path the archive of `target` is downloaded to.
pub fn archive_path(target: &ArchiveTarget) -> Result<PathBuf> {
    Ok(target.dest.join(path::archive_file_name(&target.url)?))
}

/// Whether the archive of `target` has already been downloaded.
pub fn is_present(target: &ArchiveTarget) -> Result<bool> {
    Ok(archive_path(target)?.is_file())
}

/// Result of fetching one archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive file already existed; nothing was done
    AlreadyPresent,
    /// Downloaded and extracted
    Extracted(ArchiveKind),
    /// Downloaded, but the extension is not an archive format
    DownloadedOnly,
}

/// Downloads and extracts the archives of a plan.
pub struct ArchiveFetcher {
    downloader: Box<dyn Downloader>,
}

impl ArchiveFetcher {
    pub fn new(downloader: Box<dyn Downloader>) -> Self {
        Self { downloader }
    }

    /// Fetch one archive unless its file is already in place.
    pub fn fetch(&self, target: &ArchiveTarget, reporter: &Reporter) -> Result<FetchOutcome> {
        fs::create_dir_all(&target.dest)?;

        let archive = archive_path(target)?;
        if archive.is_file() {
            log::debug!("{} already downloaded", archive.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }

        reporter.step(
            "Downloading",
            format!("{} into {}", target.url, archive.display()),
        );
        self.downloader.download(&target.url, &archive)?;

        let file_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match ArchiveKind::from_file_name(&file_name) {
            Some(kind) => {
                reporter.step("Extracting", format!("{} into {}", file_name, target.dest.display()));
                extract(&archive, &target.dest, kind)?;
                Ok(FetchOutcome::Extracted(kind))
            }
            None => {
                // TODO: decide with product owners whether this should be an error
                log::warn!(
                    "{} has no known archive extension; left as downloaded",
                    archive.display()
                );
                Ok(FetchOutcome::DownloadedOnly)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Build a zip archive holding `entries` (path, content).
    pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            for (name, content) in entries {
                writer
                    .start_file(*name, zip::write::FileOptions::default())
                    .unwrap();
                writer.write_all(content).unwrap();
            }
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    /// Build a gzip-compressed tar archive holding `entries` (path, content).
    pub fn tgz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    /// Serves fixed bytes per URL and counts downloads
    #[derive(Clone, Default)]
    pub struct MockDownloader {
        pub files: HashMap<String, Vec<u8>>,
        pub downloads: Arc<Mutex<Vec<String>>>,
    }

    impl MockDownloader {
        pub fn with_file(mut self, url: &str, content: Vec<u8>) -> Self {
            self.files.insert(url.to_string(), content);
            self
        }

        pub fn download_count(&self) -> usize {
            self.downloads.lock().unwrap().len()
        }
    }

    impl Downloader for MockDownloader {
        fn download(&self, url: &str, dest: &Path) -> Result<()> {
            self.downloads.lock().unwrap().push(url.to_string());
            match self.files.get(url) {
                Some(content) => Ok(fs::write(dest, content)?),
                None => Err(Error::Network {
                    url: url.to_string(),
                    message: "404 Not Found".to_string(),
                }),
            }
        }
    }

    fn target(url: &str, dest: &Path) -> ArchiveTarget {
        ArchiveTarget {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        }
    }

    #[test]
    fn test_archive_kind_from_file_name() {
        assert_eq!(ArchiveKind::from_file_name("a.zip"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_file_name("A.ZIP"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_file_name("a.tgz"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::from_file_name("a.tar.gz"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::from_file_name("a.tar.xz"), None);
        assert_eq!(ArchiveKind::from_file_name("installer.exe"), None);
    }

    #[test]
    fn test_zip_is_downloaded_and_extracted() {
        let temp_dir = TempDir::new().unwrap();
        let url = "https://example.com/releases/GPUPerfAPI-3.3.799.zip";
        let mock = MockDownloader::default().with_file(
            url,
            zip_bytes(&[("GPUPerfAPI/include/gpa.h", b"// header"), ("README.txt", b"readme")]),
        );
        let fetcher = ArchiveFetcher::new(Box::new(mock.clone()));
        let dest = temp_dir.path().join("Common/Lib/AMD/GPUPerfAPI");

        let outcome = fetcher.fetch(&target(url, &dest), &Reporter::silent()).unwrap();

        assert_eq!(outcome, FetchOutcome::Extracted(ArchiveKind::Zip));
        assert!(dest.join("GPUPerfAPI-3.3.799.zip").is_file());
        assert_eq!(
            fs::read_to_string(dest.join("GPUPerfAPI/include/gpa.h")).unwrap(),
            "// header"
        );
        assert!(dest.join("README.txt").is_file());
    }

    #[test]
    fn test_tgz_is_downloaded_and_extracted() {
        let temp_dir = TempDir::new().unwrap();
        let url = "https://example.com/RadeonComputeProfiler-v5.5.6947.tgz";
        let mock = MockDownloader::default()
            .with_file(url, tgz_bytes(&[("bin/VkStableClocks", b"\x7fELF")]));
        let fetcher = ArchiveFetcher::new(Box::new(mock));
        let dest = temp_dir.path().join("VKStableClocks");

        let outcome = fetcher.fetch(&target(url, &dest), &Reporter::silent()).unwrap();

        assert_eq!(outcome, FetchOutcome::Extracted(ArchiveKind::TarGz));
        assert_eq!(fs::read(dest.join("bin/VkStableClocks")).unwrap(), b"\x7fELF");
    }

    #[test]
    fn test_second_fetch_does_not_download_again() {
        let temp_dir = TempDir::new().unwrap();
        let url = "https://example.com/pkg.zip";
        let mock = MockDownloader::default().with_file(url, zip_bytes(&[("a.txt", b"a")]));
        let fetcher = ArchiveFetcher::new(Box::new(mock.clone()));
        let archive = target(url, temp_dir.path());

        let first = fetcher.fetch(&archive, &Reporter::silent()).unwrap();
        let second = fetcher.fetch(&archive, &Reporter::silent()).unwrap();

        assert_eq!(first, FetchOutcome::Extracted(ArchiveKind::Zip));
        assert_eq!(second, FetchOutcome::AlreadyPresent);
        assert_eq!(mock.download_count(), 1);
    }

    #[test]
    fn test_present_archive_is_not_reextracted() {
        let temp_dir = TempDir::new().unwrap();
        let url = "https://example.com/pkg.zip";
        // Not a valid zip: extracting it would fail
        fs::write(temp_dir.path().join("pkg.zip"), b"garbage").unwrap();
        let mock = MockDownloader::default();
        let fetcher = ArchiveFetcher::new(Box::new(mock.clone()));

        let outcome = fetcher
            .fetch(&target(url, temp_dir.path()), &Reporter::silent())
            .unwrap();

        assert_eq!(outcome, FetchOutcome::AlreadyPresent);
        assert_eq!(mock.download_count(), 0);
    }

    #[test]
    fn test_unknown_extension_is_left_as_downloaded() {
        let temp_dir = TempDir::new().unwrap();
        let url = "https://example.com/tools/installer.exe?raw=1";
        let mock = MockDownloader::default().with_file(url, b"MZ".to_vec());
        let fetcher = ArchiveFetcher::new(Box::new(mock));
        let dest = temp_dir.path().join("tools");

        let outcome = fetcher.fetch(&target(url, &dest), &Reporter::silent()).unwrap();

        assert_eq!(outcome, FetchOutcome::DownloadedOnly);
        let entries: Vec<_> = fs::read_dir(&dest)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("installer.exe")]);
    }

    #[test]
    fn test_destination_is_created_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let url = "https://example.com/data.bin";
        let mock = MockDownloader::default().with_file(url, vec![1, 2, 3]);
        let fetcher = ArchiveFetcher::new(Box::new(mock));
        let dest = temp_dir.path().join("a/b/c");

        fetcher.fetch(&target(url, &dest), &Reporter::silent()).unwrap();

        assert!(dest.join("data.bin").is_file());
    }

    #[test]
    fn test_download_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::new(Box::new(MockDownloader::default()));

        let err = fetcher
            .fetch(&target("https://example.com/missing.zip", temp_dir.path()), &Reporter::silent())
            .unwrap_err();

        assert!(matches!(err, Error::Network { .. }));
    }

    #[test]
    fn test_corrupt_zip_is_archive_error() {
        let temp_dir = TempDir::new().unwrap();
        let url = "https://example.com/broken.zip";
        let mock = MockDownloader::default().with_file(url, b"not a zip".to_vec());
        let fetcher = ArchiveFetcher::new(Box::new(mock));

        let err = fetcher
            .fetch(&target(url, temp_dir.path()), &Reporter::silent())
            .unwrap_err();

        assert!(matches!(err, Error::Archive { .. }));
    }

    #[test]
    fn test_is_present() {
        let temp_dir = TempDir::new().unwrap();
        let archive = target("https://example.com/x.tgz?sig=1", temp_dir.path());
        assert!(!is_present(&archive).unwrap());
        fs::write(temp_dir.path().join("x.tgz"), b"").unwrap();
        assert!(is_present(&archive).unwrap());
    }
}
