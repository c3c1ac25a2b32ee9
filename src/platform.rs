//! Host platform detection for selecting the release artifact to download.

use std::fmt;

/// The closed set of platforms the release server publishes artifacts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Unknown,
}

impl Platform {
    /// Detect the platform of the running host.
    pub fn detect() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map an operating-system name to a [`Platform`].
    ///
    /// Pure and case-insensitive; anything outside the known set (including
    /// the empty string) degrades to [`Platform::Unknown`] rather than
    /// erroring.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "darwin" | "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            _ => Platform::Unknown,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => write!(f, "macOS"),
            Platform::Linux => write!(f, "Linux"),
            Platform::Unknown => write!(f, "Unknown"),
        }
    }
}
