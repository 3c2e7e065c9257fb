//! Fetching archive files to local paths.
//!
//! [`Downloader`] is the seam between the archive fetcher and the network.
//! [`HttpDownloader`] performs a blocking GET with `reqwest` and also accepts
//! `file://` URLs, which lets a workspace be populated from a local mirror.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use url::Url;

use crate::error::{Error, Result};

/// Downloads a URL to a file.
pub trait Downloader: Send + Sync {
    /// Write the content behind `url` to `dest`, replacing it if present.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Downloads over HTTP(S), or copies for `file://` URLs
pub struct HttpDownloader {
    client: Client,
    show_progress: bool,
}

impl HttpDownloader {
    /// Build the downloader. Progress bars are drawn only when
    /// `show_progress` is set.
    pub fn new(show_progress: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            client,
            show_progress,
        })
    }

    fn fetch_http(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| network_error(url, e))?;

        let bar = self.progress_bar(response.content_length());
        let file = File::create(dest)?;
        let mut writer = bar.wrap_write(BufWriter::new(file));
        std::io::copy(&mut response, &mut writer).map_err(|e| network_error(url, e))?;
        writer.flush()?;
        bar.finish_and_clear();
        Ok(())
    }

    fn progress_bar(&self, length: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match length {
            Some(length) => {
                let bar = ProgressBar::new(length);
                if let Ok(style) = ProgressStyle::with_template(
                    "{spinner} [{bar:40}] {bytes}/{total_bytes} ({eta})",
                ) {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template("{spinner} {bytes}") {
                    bar.set_style(style);
                }
                bar
            }
        }
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let parsed = Url::parse(url)?;
        let result = if parsed.scheme() == "file" {
            copy_local(url, &parsed, dest)
        } else {
            self.fetch_http(url, dest)
        };

        // A partial file would be mistaken for a finished download next run
        if result.is_err() && dest.exists() {
            let _ = fs::remove_file(dest);
        }
        result
    }
}

fn copy_local(url: &str, parsed: &Url, dest: &Path) -> Result<()> {
    let source = parsed.to_file_path().map_err(|_| Error::Network {
        url: url.to_string(),
        message: "not a local file path".to_string(),
    })?;
    log::debug!("copying {} to {}", source.display(), dest.display());
    fs::copy(&source, dest).map_err(|e| network_error(url, e))?;
    Ok(())
}

fn network_error(url: &str, error: impl std::fmt::Display) -> Error {
    Error::Network {
        url: url.to_string(),
        message: error.to_string(),
    }
}
