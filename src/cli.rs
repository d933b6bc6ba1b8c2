//! Command-line parsing for code-marshal-install

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{
    self, DEFAULT_API_URL, DEFAULT_REPO, InstallRequest, RepositoryId, VersionSelector,
};
use crate::error::{InstallError, Result};

/// Command-line arguments for code-marshal-install
#[derive(Parser, Debug, Clone)]
#[command(name = "code-marshal-install")]
// `--version` selects a release tag, so clap's own version flag stays off.
#[command(about = "Install a prebuilt release binary from GitHub for this machine")]
pub struct Cli {
    /// Repository to install from (owner/name)
    #[arg(
        long,
        env = "CODE_MARSHAL_REPO",
        default_value = DEFAULT_REPO,
        value_parser = RepositoryId::from_str
    )]
    pub repo: RepositoryId,

    /// Release tag to install, or "latest"
    #[arg(long, env = "CODE_MARSHAL_VERSION", default_value = "latest")]
    pub version: String,

    /// Install directory [default: ~/.local/bin]
    #[arg(long, env = "CODE_MARSHAL_PREFIX")]
    pub prefix: Option<PathBuf>,

    /// Overwrite an existing binary at the install location
    #[arg(long)]
    pub force: bool,

    /// Binary name inside the release archive [default: repository name]
    #[arg(long, env = "CODE_MARSHAL_BIN", value_parser = config::parse_binary_name)]
    pub bin: Option<String>,

    /// Resolve the release and asset, print the plan, and stop
    #[arg(long)]
    pub dry_run: bool,

    /// GitHub API root (GitHub Enterprise, mirrors)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,

    /// Token sent with release API requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, hide = true)]
    pub github_token: Option<String>,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// `--help` exits 0; unknown or malformed arguments print usage and exit non-zero.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply defaults and validate into an immutable request
    pub fn into_request(self) -> Result<InstallRequest> {
        let prefix = match self.prefix {
            Some(prefix) => prefix,
            None => config::default_prefix().ok_or(InstallError::NoDefaultPrefix)?,
        };

        let mut request = InstallRequest::new(self.repo, prefix);
        request.version = VersionSelector::parse(&self.version);
        request.overwrite = self.force;
        request.dry_run = self.dry_run;
        request.api_url = self.api_url;
        request.github_token = self.github_token.filter(|t| !t.trim().is_empty());
        if let Some(bin) = self.bin {
            request.binary_name = bin;
        }
        Ok(request)
    }
}
