//! Remote artifact acquisition: downloads the analyser binary and the
//! preprocessor script from the release server into the tools directory.

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::context::RunContext;
use crate::platform::Platform;
use crate::provision::ensure_directory;

const RELEASE_BASE_URL: &str = "https://releases.knowl.io/api-docs";
const ANALYSER_ARTIFACT_MAC: &str = "python_analyser_mac";
const ANALYSER_ARTIFACT_LINUX: &str = "python_analyser_linux";
const PREPROCESSOR_ARTIFACT: &str = "preprocess_django.py";

#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    Io(std::io::Error),
    /// The buffered download path saw a non-success HTTP status.
    DownloadFailed(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "http request failed: {}", e),
            FetchError::Io(e) => write!(f, "i/o error during download: {}", e),
            FetchError::DownloadFailed(status) => {
                write!(f, "failed to download the file. HTTP status code: {}", status)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Streaming fetch for large executables.
///
/// Ensures the destination directory exists, streams the response body into
/// `dest_path`, then marks the file executable (mode 0755). An existing file
/// at the destination is overwritten without confirmation.
///
/// The body is written whatever the response status: the release server is
/// assumed to resolve these URLs. A non-success status is surfaced as a
/// warning only, to keep parity with how the tooling has always behaved.
pub async fn fetch_executable(url: &str, dest_dir: &Path, dest_path: &Path) -> Result<(), FetchError> {
    info!(url = url, "Download begins ...");

    ensure_directory(dest_dir)?;

    let mut response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        warn!(
            url = url,
            status = %status,
            "Release server returned a non-success status; writing body anyway"
        );
    }

    let mut file = tokio::fs::File::create(dest_path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    drop(file);

    mark_executable(dest_path)?;

    info!(path = %dest_path.display(), "Download ends ...");
    Ok(())
}

/// Buffered fetch for small scripts.
///
/// The destination filename is the last segment of the URL. A non-2xx status
/// is a hard failure: nothing is written and [`FetchError::DownloadFailed`]
/// carries the status code.
pub async fn fetch_buffered(url: &str, dest_dir: &Path) -> Result<PathBuf, FetchError> {
    let filename = url.rsplit('/').next().unwrap_or(url);
    let dest_path = dest_dir.join(filename);

    ensure_directory(dest_dir)?;

    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        error!(url = url, status = %status, "Failed to download the file");
        return Err(FetchError::DownloadFailed(status.as_u16()));
    }

    let body = response.bytes().await?;
    tokio::fs::write(&dest_path, &body).await?;

    info!(file = filename, "File downloaded successfully");
    Ok(dest_path)
}

/// Acquire both tools for this run: the platform-specific analyser binary
/// (streamed, made executable) and the preprocessor script (buffered).
pub async fn download_tools(ctx: &RunContext) -> Result<(), FetchError> {
    let platform = Platform::detect();
    info!(platform = %platform, "OS detected");

    // Unknown platforms fall back to the linux artifact.
    let artifact = match platform {
        Platform::MacOs => ANALYSER_ARTIFACT_MAC,
        Platform::Linux | Platform::Unknown => ANALYSER_ARTIFACT_LINUX,
    };
    let analyser_url = format!("{}/{}", RELEASE_BASE_URL, artifact);
    fetch_executable(&analyser_url, &ctx.tools_dir, &ctx.analyser_path).await?;

    let preprocessor_url = format!("{}/{}", RELEASE_BASE_URL, PREPROCESSOR_ARTIFACT);
    fetch_buffered(&preprocessor_url, &ctx.tools_dir).await?;

    Ok(())
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
