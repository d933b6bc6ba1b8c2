//! Install request model
//!
//! An [`InstallRequest`] is built once from the command line (see `cli`) and
//! never changes for the rest of the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::InstallError;

/// Repository installed when `--repo` is not given
pub const DEFAULT_REPO: &str = "code-marshal/code-marshal";

/// GitHub REST API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub repository identifier (`owner/name`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepositoryId {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InstallError::InvalidRepository(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        let valid_part = |p: &str| {
            !p.is_empty()
                && !matches!(p, "." | "..")
                && !p.contains('/')
                && !p.chars().any(char::is_whitespace)
        };
        if !valid_part(owner) || !valid_part(name) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Check that `name` is a single path component usable as a file name
///
/// Rejects empty names, `.`, `..`, and anything containing a path separator
/// or NUL, so the name can only ever resolve inside the install prefix.
pub fn parse_binary_name(name: &str) -> Result<String, InstallError> {
    let invalid = name.trim().is_empty()
        || matches!(name, "." | "..")
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(InstallError::InvalidBinaryName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Which release to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    Latest,
    Tag(String),
}

impl VersionSelector {
    /// Parse `latest` (any case) or an explicit tag. Blank input means latest.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("latest") {
            Self::Latest
        } else {
            Self::Tag(raw.to_string())
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Fully resolved install request
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub repository: RepositoryId,
    pub version: VersionSelector,
    pub prefix: PathBuf,
    pub overwrite: bool,
    /// Executable name inside the archive and under `prefix`
    pub binary_name: String,
    pub api_url: String,
    pub github_token: Option<String>,
    pub dry_run: bool,
}

impl InstallRequest {
    /// Request with defaults for everything but the repository.
    ///
    /// The binary name defaults to the repository name.
    pub fn new(repository: RepositoryId, prefix: PathBuf) -> Self {
        Self {
            binary_name: repository.name.clone(),
            repository,
            version: VersionSelector::Latest,
            prefix,
            overwrite: false,
            api_url: DEFAULT_API_URL.to_string(),
            github_token: None,
            dry_run: false,
        }
    }

    /// Where the binary ends up
    pub fn target_path(&self) -> PathBuf {
        self.prefix.join(&self.binary_name)
    }
}

/// Per-user binary directory: `$HOME/.local/bin`
pub fn default_prefix() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".local").join("bin"))
}

/// True when `dir` appears in the `PATH`-style list `path_var`
pub fn path_contains(path_var: &std::ffi::OsStr, dir: &Path) -> bool {
    std::env::split_paths(path_var).any(|entry| entry == dir)
}
