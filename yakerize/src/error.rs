//! Error types for the yakerize pipeline.
//!
//! Every variant is terminal for the run. Messages name the offending path,
//! URL or value and, where the user can fix the problem, carry a remedy hint.

use crate::download::DownloadError;
use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// The input files and directories a package request is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// The project readme copied into `misc/`.
    Readme,
    /// The project license copied into `misc/`.
    License,
    /// The yak manifest template.
    Manifest,
    /// The package logo.
    Logo,
    /// The directory holding pre-built `.ghuser` components.
    ComponentsDir,
}

impl InputKind {
    /// Return the hint printed alongside a missing or unspecified input.
    #[must_use]
    pub const fn remedy(self) -> &'static str {
        match self {
            Self::Readme => "pass --readme-path with a valid file",
            Self::License => "pass --license-path with a valid file",
            Self::Manifest => "pass --manifest-path or set yak.manifest_path in yakerize.toml",
            Self::Logo => "pass --logo-path or set yak.logo_path in yakerize.toml",
            Self::ComponentsDir => {
                "pass --components-dir or add a [ghuser] block with a target_dir to yakerize.toml"
            }
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Readme => "readme file",
            Self::License => "license file",
            Self::Manifest => "manifest file",
            Self::Logo => "logo file",
            Self::ComponentsDir => "components directory",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while staging and building a yak package.
#[derive(Debug, Error)]
pub enum YakerizeError {
    /// A required input path was resolved but does not exist.
    #[error("{kind} not found at {path}; {}", .kind.remedy())]
    InputNotFound {
        /// Which input is missing.
        kind: InputKind,
        /// Where it was expected.
        path: Utf8PathBuf,
    },

    /// A required input exists but cannot be opened for reading.
    #[error("{kind} at {path} cannot be read: {source}; {}", .kind.remedy())]
    InputUnreadable {
        /// Which input is unreadable.
        kind: InputKind,
        /// The path that failed to open.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A required input could not be resolved from arguments or configuration.
    #[error("{kind} not specified; {}", .kind.remedy())]
    InputUnspecified {
        /// Which input is unspecified.
        kind: InputKind,
    },

    /// The target platform identifier is not in the supported set.
    #[error("unsupported target platform \"{value}\"; expected one of: {expected}")]
    UnsupportedPlatform {
        /// The rejected identifier.
        value: String,
        /// Comma-separated list of accepted identifiers.
        expected: String,
    },

    /// The builder `--platform` value is not recognised.
    #[error("unsupported build platform \"{value}\"; expected one of: {expected}")]
    UnsupportedBuildPlatform {
        /// The rejected value.
        value: String,
        /// Comma-separated list of accepted values.
        expected: String,
    },

    /// No version was supplied and none could be read from the version file.
    #[error("failed to get version from {path}: {reason}; pass --version explicitly")]
    VersionUnavailable {
        /// The project metadata file that was consulted.
        path: Utf8PathBuf,
        /// Why no version could be read.
        reason: String,
    },

    /// The project configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// Clearing, creating or populating the staging directory failed.
    #[error("staging failed at {path}: {reason}")]
    StagingFailed {
        /// The entry that could not be processed.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The staged manifest could not be rewritten.
    #[error("failed to set version in manifest {path}")]
    ManifestTemplating {
        /// Path to the staged manifest.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The component source directory could not be read.
    #[error("failed to read components directory {path}")]
    ComponentsUnreadable {
        /// Path to the component source directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Fetching the builder executable failed.
    #[error("failed to download the yak executable: {0}")]
    Download(#[from] DownloadError),

    /// The downloaded builder does not match the configured digest.
    #[error("yak executable checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Digest from configuration.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },

    /// An external command could not be started.
    #[error("failed to launch {program}: {reason}")]
    CommandLaunch {
        /// The program that was invoked.
        program: String,
        /// Description of the launch failure.
        reason: String,
    },

    /// An external command exceeded its time budget and was killed.
    #[error("{program} timed out after {seconds} seconds")]
    CommandTimeout {
        /// The program that was invoked.
        program: String,
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// The builder executable exited unsuccessfully.
    #[error("failed to build the yak package: {reason}")]
    BuilderFailed {
        /// The builder's error output or launch failure.
        reason: String,
    },

    /// The builder finished but produced no artefact.
    #[error("no .yak file was created in the build directory {dir}")]
    NoArtefact {
        /// The staging directory that was searched.
        dir: Utf8PathBuf,
    },

    /// More than one artefact was found, so the result is ambiguous.
    #[error("expected exactly one .yak file in {dir}, found: {found}")]
    AmbiguousArtefacts {
        /// The staging directory that was searched.
        dir: Utf8PathBuf,
        /// Comma-separated, sorted artefact file names.
        found: String,
    },

    /// The artefact name does not carry the generic platform tokens.
    #[error("artefact {name} does not end with the generic \"-any-any\" platform tag")]
    UnexpectedArtefactName {
        /// The artefact file name.
        name: String,
    },

    /// The changelog could not be prepared.
    #[error("failed to prepare changelog {path}: {reason}")]
    Changelog {
        /// Path to the changelog.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A git operation failed.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed (add, commit).
        operation: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`YakerizeError`].
pub type Result<T> = std::result::Result<T, YakerizeError>;
