//! Error taxonomy for the release installer
//!
//! Every variant is terminal: the stage that discovers it aborts the pipeline
//! and the message is printed as the single diagnostic line.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for installer operations.
pub type Result<T> = std::result::Result<T, InstallError>;

/// Errors that can abort an install run.
#[derive(Error, Debug)]
pub enum InstallError {
    /// A required external utility is not on `PATH`.
    #[error("missing dependency: {0} is required but was not found on PATH")]
    MissingDependency(String),

    /// The OS belongs to a known family this installer does not serve.
    #[error("unsupported platform: {0} (Windows is not supported; use WSL)")]
    UnsupportedPlatform(String),

    /// The OS name is not in the mapping table.
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    /// The machine architecture is not in the mapping table.
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    /// Repository identifier is not of the form `owner/name`.
    #[error("invalid repository '{0}': expected owner/name")]
    InvalidRepository(String),

    /// Binary name is not a plain file name.
    #[error("invalid binary name '{0}': expected a plain file name without path separators")]
    InvalidBinaryName(String),

    /// No `--prefix` was given and the home directory is unknown.
    #[error("could not determine the home directory; pass --prefix")]
    NoDefaultPrefix,

    /// The release API did not yield a usable tag name.
    #[error("failed to resolve release tag for {repo}: {reason}")]
    ReleaseResolution {
        /// Repository that was queried.
        repo: String,
        /// What went wrong with the request or response.
        reason: String,
    },

    /// No release asset matches this platform.
    #[error("no release asset named {expected} in release {tag}")]
    AssetNotFound {
        /// The exact filename that was searched for.
        expected: String,
        /// Tag of the release that was searched.
        tag: String,
    },

    /// The target binary exists and overwrite was not requested.
    #[error("{} already exists; re-run with --force to overwrite it", .0.display())]
    ExistingInstallConflict(PathBuf),

    /// Transport error, bad status, or exhausted retries while downloading.
    #[error("failed to download {url}: {reason}")]
    DownloadFailure {
        /// URL that was being fetched.
        url: String,
        /// Last failure observed.
        reason: String,
    },

    /// The archive unpacked but the expected binary is not at its root.
    #[error("archive did not contain expected binary '{binary}' at its root")]
    ArchiveContentsInvalid {
        /// Binary name that was expected.
        binary: String,
    },

    /// Filesystem failure while extracting or placing the binary.
    #[error("{context} ({})", .path.display())]
    Io {
        /// What the installer was doing.
        context: &'static str,
        /// Path involved in the failed operation.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    /// Wrap an I/O error with the operation and path that failed.
    pub(crate) fn io(
        context: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
