//! Idempotent filesystem provisioning for result and tool directories.

use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// First line written into a freshly provisioned placeholder file.
pub const NEW_RUN_SENTINEL: &str = "--new run--";

/// Ensure `path` exists as a directory, creating missing parents.
///
/// Calling this twice leaves the filesystem in the same state as calling it
/// once. I/O errors propagate; the caller decides whether they are fatal.
pub fn ensure_directory(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        info!(path = %path.display(), "Directory already exists");
        return Ok(());
    }
    fs::create_dir_all(path)?;
    info!(path = %path.display(), "Directory created");
    Ok(())
}

/// Ensure `path` exists as a regular file.
///
/// A missing file is created with the [`NEW_RUN_SENTINEL`] line; an existing
/// file is left untouched.
pub fn ensure_file(path: &Path) -> std::io::Result<()> {
    if path.is_file() {
        info!(path = %path.display(), "File already exists");
        return Ok(());
    }
    let mut file = fs::File::create(path)?;
    file.write_all(NEW_RUN_SENTINEL.as_bytes())?;
    info!(path = %path.display(), "File created");
    Ok(())
}
