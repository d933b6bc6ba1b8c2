//! Install a prebuilt release binary from GitHub for the running machine.
//!
//! The pipeline is linear: check for a fetch utility, map the host to a
//! target triple, resolve the release, pick the matching `.tar.gz` asset,
//! download and unpack it in a scratch directory, then place the binary in
//! the install prefix. See [`Installer`].

pub mod binary_staging;
pub mod capability;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod orchestration;
pub mod scratch;

pub use config::{InstallRequest, RepositoryId, VersionSelector};
pub use error::{InstallError, Result};
pub use orchestration::{InstallOutcome, InstallPlan, Installer};

/// Run the full install for `request` on this host
pub async fn install(request: InstallRequest) -> Result<InstallOutcome> {
    Installer::new(request).run().await
}
