//! Archive download through the system fetch utility
//!
//! `curl` downloads are retried a fixed number of times with a fixed pause;
//! `wget` gets a single attempt.

use log::{info, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::error::{InstallError, Result};

/// Retries after the first failed `curl` attempt
pub const DOWNLOAD_RETRIES: u32 = 3;

/// Pause between `curl` attempts
pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// How archives are fetched, chosen by the capability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStrategy {
    Curl { program: PathBuf },
    Wget { program: PathBuf },
}

impl FetchStrategy {
    pub fn program(&self) -> &Path {
        match self {
            Self::Curl { program } | Self::Wget { program } => program,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Curl { .. } => "curl",
            Self::Wget { .. } => "wget",
        }
    }

    /// Total attempts, including the first
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Curl { .. } => 1 + DOWNLOAD_RETRIES,
            Self::Wget { .. } => 1,
        }
    }

    /// Arguments for one attempt; both tools exit non-zero on HTTP errors
    pub fn args(&self, url: &str, dest: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = match self {
            Self::Curl { .. } => ["--fail", "--silent", "--show-error", "--location", "--output"]
                .into_iter()
                .map(OsString::from)
                .collect(),
            Self::Wget { .. } => ["--quiet", "--output-document"]
                .into_iter()
                .map(OsString::from)
                .collect(),
        };
        args.push(dest.as_os_str().to_owned());
        args.push(OsString::from(url));
        args
    }

    /// Download `url` to `dest`
    pub async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.download_with_backoff(url, dest, RETRY_BACKOFF).await
    }

    pub(crate) async fn download_with_backoff(
        &self,
        url: &str,
        dest: &Path,
        backoff: Duration,
    ) -> Result<()> {
        let failure = |reason: String| InstallError::DownloadFailure {
            url: url.to_string(),
            reason,
        };
        let attempts = self.attempts();
        info!("Downloading {url}");

        let mut last_error = String::new();
        for attempt in 1..=attempts {
            let output = Command::new(self.program())
                .args(self.args(url, dest))
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|e| failure(format!("could not run {}: {e}", self.program().display())))?;

            if output.status.success() {
                if !dest.is_file() {
                    let reason = format!("{} reported success but wrote no file", self.name());
                    return Err(failure(reason));
                }
                return Ok(());
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            last_error = match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                Some(line) => line.trim().to_string(),
                None => format!("{} exited with {}", self.name(), output.status),
            };
            // wget leaves an empty file behind on HTTP errors
            let _ = std::fs::remove_file(dest);

            if attempt < attempts {
                warn!(
                    "Download attempt {attempt}/{attempts} failed ({last_error}); retrying in {}s",
                    backoff.as_secs()
                );
                tokio::time::sleep(backoff).await;
            }
        }

        Err(failure(if attempts > 1 {
            format!("{last_error} (after {attempts} attempts)")
        } else {
            last_error
        }))
    }
}
