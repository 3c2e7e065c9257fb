//! # Error Handling
//!
//! This module defines the centralized error type for `update-common`. It uses
//! the `thiserror` library to describe every anticipated failure mode with
//! enough context (command, directory, URL, path) for an operator to act on it.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum covering all failures of the library.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Failures are grouped as follows:
//!
//! - Host platform not supported (fatal before any work).
//! - Git invocations that exit non-zero or cannot be started.
//! - Manifest discovery and parsing problems.
//! - Download and archive extraction failures.
//! - Wrapped I/O, YAML, TOML and URL errors.
//!
//! [`Error::exit_code`] maps each variant to the process exit status the
//! binary reports. A failing git command propagates git's own exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for update-common operations
#[derive(Error, Debug)]
pub enum Error {
    /// The host operating system is not one the manifest tables know about.
    #[error("Operating system not recognized: {os}")]
    UnsupportedPlatform { os: String },

    /// A git command ran but exited with a non-zero status.
    #[error("'git {command}' failed in {} with return code {}", dir.display(), code.map(|c| c.to_string()).unwrap_or_else(|| "<signal>".to_string()))]
    GitCommand {
        command: String,
        dir: PathBuf,
        /// Exit code of the git process, `None` if it was killed by a signal
        code: Option<i32>,
    },

    /// The git executable could not be started at all.
    #[error("Failed to run 'git {command}': {message}")]
    GitSpawn { command: String, message: String },

    /// No manifest file was found in any of the searched locations.
    #[error("Manifest file not found (searched: {})", searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    ManifestNotFound { searched: Vec<PathBuf> },

    /// The manifest could be read but its content is invalid.
    ///
    /// This error includes the specific issue and optionally a hint about how
    /// to fix it.
    #[error("Manifest error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// A download failed.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// The HTTP client could not be set up.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// An archive could not be opened or extracted.
    #[error("Archive error: {} - {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// The exit status the process should terminate with for this error.
    ///
    /// Git failures carry git's own exit code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::GitCommand {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
