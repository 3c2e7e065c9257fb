//! Host platform selection.
//!
//! The manifest can restrict archives and placements to one platform. The
//! platform is chosen exactly once, at process entry, and passed down as a
//! value to [`crate::manifest::Manifest::resolve`].

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Platforms the manifest tables can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// Detect the platform this binary is running on, then apply the
    /// `requested` override.
    pub fn detect(requested: Option<Platform>) -> Result<Self> {
        Self::select(std::env::consts::OS, requested)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform.
    ///
    /// Cygwin counts as Windows.
    pub fn from_os(os: &str) -> Result<Self> {
        let os_lower = os.to_lowercase();
        if os_lower.contains("windows") || os_lower.contains("cygwin") {
            Ok(Platform::Windows)
        } else if os_lower.contains("linux") {
            Ok(Platform::Linux)
        } else {
            Err(Error::UnsupportedPlatform { os: os.to_string() })
        }
    }

    /// Platform whose manifest tables are used on host `os`.
    ///
    /// `requested` picks another platform's tables, but the host itself must
    /// still be a supported one.
    pub fn select(os: &str, requested: Option<Platform>) -> Result<Self> {
        let host = Self::from_os(os)?;
        Ok(requested.unwrap_or(host))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
