//! Install pipeline
//!
//! Stages run strictly in order and the first failure aborts the run:
//! capability check, platform mapping, conflict pre-check, release lookup,
//! asset selection, download, extraction, placement.

use log::{debug, info};
use std::path::PathBuf;

use crate::binary_staging::{check_existing, install_binary};
use crate::capability::check_capabilities;
use crate::config::{InstallRequest, parse_binary_name};
use crate::download::extract::{locate_binary, unpack_archive};
use crate::download::{
    FetchStrategy, HostInfo, PlatformTriple, ReleaseClient, expected_asset_name,
};
use crate::error::Result;
use crate::scratch::ScratchSpace;

/// What an install would do, resolved without touching the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub tag: String,
    pub asset_name: String,
    pub download_url: String,
    pub target: PathBuf,
}

/// Result of a completed install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub binary_path: PathBuf,
    pub tag: String,
}

/// Runs one install request
///
/// Host detection, the fetch utility and the scratch location default to the
/// running system and can be pinned for tests.
#[derive(Debug)]
pub struct Installer {
    request: InstallRequest,
    host: Option<HostInfo>,
    fetch_strategy: Option<FetchStrategy>,
    scratch_root: Option<PathBuf>,
}

impl Installer {
    pub fn new(request: InstallRequest) -> Self {
        Self {
            request,
            host: None,
            fetch_strategy: None,
            scratch_root: None,
        }
    }

    /// Use these raw OS/arch strings instead of `uname`
    #[must_use]
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = Some(host);
        self
    }

    /// Skip the `PATH` probe and download with `strategy`
    #[must_use]
    pub fn with_fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.fetch_strategy = Some(strategy);
        self
    }

    /// Create the scratch directory under `root` instead of the system temp dir
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn request(&self) -> &InstallRequest {
        &self.request
    }

    /// The download strategy, probing `PATH` unless one was pinned
    pub fn fetch_strategy(&self) -> Result<FetchStrategy> {
        match &self.fetch_strategy {
            Some(strategy) => Ok(strategy.clone()),
            None => check_capabilities(),
        }
    }

    /// Target triple for the configured or detected host
    pub fn platform(&self) -> Result<PlatformTriple> {
        let host = match &self.host {
            Some(host) => host.clone(),
            None => HostInfo::detect()?,
        };
        PlatformTriple::from_host(&host)
    }

    /// Resolve release and asset. Nothing is written.
    pub async fn plan(&self) -> Result<InstallPlan> {
        let request = &self.request;
        parse_binary_name(&request.binary_name)?;
        let triple = self.platform()?;
        debug!("Target platform {triple}");

        let target = request.target_path();
        check_existing(&target, request.overwrite)?;

        let client = ReleaseClient::new(&request.api_url, request.github_token.as_deref())?;
        let release = client
            .fetch_release(&request.repository, &request.version)
            .await?;

        let asset_name = expected_asset_name(&request.binary_name, &release.tag_name, &triple);
        let asset = release.select_asset(&asset_name)?;

        Ok(InstallPlan {
            tag: release.tag_name.clone(),
            asset_name,
            download_url: asset.browser_download_url.clone(),
            target,
        })
    }

    /// Run the whole pipeline
    pub async fn run(&self) -> Result<InstallOutcome> {
        let strategy = self.fetch_strategy()?;
        let plan = self.plan().await?;
        self.execute(&plan, &strategy).await
    }

    async fn execute(
        &self,
        plan: &InstallPlan,
        strategy: &FetchStrategy,
    ) -> Result<InstallOutcome> {
        let request = &self.request;

        // Dropped at the end of this scope on every path
        let scratch = match &self.scratch_root {
            Some(root) => ScratchSpace::create_in(root)?,
            None => ScratchSpace::create()?,
        };

        let archive = scratch.join(&plan.asset_name);
        strategy.download(&plan.download_url, &archive).await?;

        let extracted = scratch.join("extracted");
        unpack_archive(&archive, &extracted).await?;
        let binary = locate_binary(&extracted, &request.binary_name)?;

        let binary_path = install_binary(&binary, &request.prefix, &request.binary_name)?;
        info!("{} {} installed to {}", request.binary_name, plan.tag, binary_path.display());

        Ok(InstallOutcome {
            binary_path,
            tag: plan.tag.clone(),
        })
    }
}
