//! GitHub release API interaction

use log::{debug, info};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::{RepositoryId, VersionSelector};
use crate::error::{InstallError, Result};

const USER_AGENT: &str = concat!("code-marshal-install/", env!("CARGO_PKG_VERSION"));
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Release metadata with a validated, non-empty tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMetadata {
    pub tag_name: String,
    pub assets: Vec<Asset>,
}

/// GitHub release asset metadata
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// Release document as GitHub returns it; unknown fields are ignored
#[derive(Deserialize, Debug)]
struct GitHubRelease {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<Asset>,
}

impl GitHubRelease {
    /// Validate into [`ReleaseMetadata`]; an absent or blank tag is a resolution failure
    fn into_metadata(self, repo: &RepositoryId) -> Result<ReleaseMetadata> {
        let tag_name = self
            .tag_name
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| InstallError::ReleaseResolution {
                repo: repo.to_string(),
                reason: "release response has no tag_name".to_string(),
            })?;

        Ok(ReleaseMetadata {
            tag_name,
            assets: self.assets,
        })
    }
}

/// Decode a release API response body
pub fn decode_release(repo: &RepositoryId, body: &str) -> Result<ReleaseMetadata> {
    let release: GitHubRelease =
        serde_json::from_str(body).map_err(|e| InstallError::ReleaseResolution {
            repo: repo.to_string(),
            reason: format!("unreadable release response: {e}"),
        })?;
    release.into_metadata(repo)
}

/// Client for the GitHub releases endpoints
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: reqwest::Client,
    api_url: Url,
}

impl ReleaseClient {
    /// Build a client against `api_url`, optionally authenticating with `token`
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self> {
        let invalid = |reason: String| InstallError::ReleaseResolution {
            repo: api_url.to_string(),
            reason,
        };
        let api_url =
            Url::parse(api_url).map_err(|e| invalid(format!("invalid API URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| invalid("GITHUB_TOKEN is not a valid header value".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(API_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, api_url })
    }

    /// `releases/latest` or `releases/tags/{tag}` under the repository
    pub fn release_endpoint(&self, repo: &RepositoryId, version: &VersionSelector) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                InstallError::ReleaseResolution {
                    repo: repo.to_string(),
                    reason: format!("API URL {} cannot hold a path", self.api_url),
                }
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "releases"]);
            match version {
                VersionSelector::Latest => {
                    segments.push("latest");
                }
                VersionSelector::Tag(tag) => {
                    segments.extend(["tags", tag.as_str()]);
                }
            }
        }
        Ok(url)
    }

    /// Fetch and decode one release. A single request; failures are not retried.
    pub async fn fetch_release(
        &self,
        repo: &RepositoryId,
        version: &VersionSelector,
    ) -> Result<ReleaseMetadata> {
        let failure = |reason: String| InstallError::ReleaseResolution {
            repo: repo.to_string(),
            reason,
        };
        let url = self.release_endpoint(repo, version)?;
        debug!("GET {url}");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failure(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(failure(format!("release {version} not found")));
        }
        if !status.is_success() {
            return Err(failure(format!("GitHub API returned HTTP {status}")));
        }

        let release = response
            .json::<GitHubRelease>()
            .await
            .map_err(|e| failure(format!("unreadable release response: {e}")))?
            .into_metadata(repo)?;
        info!("Resolved {version} release of {repo} to {}", release.tag_name);
        Ok(release)
    }
}
