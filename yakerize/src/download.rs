//! Builder executable download.
//!
//! The packaging executable is fetched from the vendor's versionless
//! "latest" endpoint on every run. The body is streamed into a temporary
//! file inside the staging directory and only persisted under
//! [`BUILDER_EXECUTABLE`] once it has been received and verified, so a
//! failed download never leaves an executable behind.

use crate::error::{Result, YakerizeError};
use crate::verification::BuilderVerifier;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::path::Path;
use std::time::Duration;

/// Vendor download location of the packaging executable.
pub const YAK_URL: &str = "https://files.mcneel.com/yak/tools/latest/yak.exe";

/// File name the executable is persisted under inside the staging area.
pub const BUILDER_EXECUTABLE: &str = "yak.exe";

/// Network timeout applied to the whole download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching the builder executable.
///
/// Implementations write the response body to `dest` and return the number
/// of bytes written.
#[cfg_attr(test, mockall::automock)]
pub trait BuilderDownloader {
    /// Download `url` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with an
    /// error status, or the body cannot be written.
    fn download(&self, url: &str, dest: &Path) -> std::result::Result<u64, DownloadError>;
}

/// Errors arising from the builder download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server answered 404.
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The server answered with another error status.
    #[error("{url} returned HTTP status {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The request failed before a status was received.
    #[error("request to {url} failed: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// Writing the downloaded body failed.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP downloader backed by a `ureq` agent with a global timeout.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    /// Create a downloader whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_TIMEOUT)
    }
}

impl BuilderDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> std::result::Result<u64, DownloadError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        let written = std::io::copy(&mut response.into_body().as_reader(), &mut file)?;
        file.sync_all()?;
        Ok(written)
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::StatusCode(status) => DownloadError::Status {
            url: url.to_owned(),
            status: *status,
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// Download, verify and persist the builder executable into `staging_dir`.
///
/// Returns the path of the persisted executable.
///
/// # Errors
///
/// Returns [`YakerizeError::Download`] if the fetch fails,
/// [`YakerizeError::ChecksumMismatch`] if verification rejects the bytes, or
/// [`YakerizeError::Io`] if the file cannot be persisted.
pub fn install_builder(
    staging_dir: &Utf8Path,
    url: &str,
    downloader: &dyn BuilderDownloader,
    verifier: &dyn BuilderVerifier,
) -> Result<Utf8PathBuf> {
    let partial = tempfile::Builder::new()
        .prefix(".yak-download-")
        .tempfile_in(staging_dir)?;

    info!("downloading builder from {url}");
    let size = downloader.download(url, partial.path())?;
    debug!("received {size} bytes from {url}");

    verifier.verify(partial.path())?;

    let dest = staging_dir.join(BUILDER_EXECUTABLE);
    partial
        .persist(&dest)
        .map_err(|e| YakerizeError::Io(e.error))?;
    make_executable(&dest)?;
    Ok(dest)
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}
