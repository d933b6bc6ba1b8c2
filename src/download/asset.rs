//! Release asset selection

use log::debug;

use super::github::{Asset, ReleaseMetadata};
use super::platform::PlatformTriple;
use crate::error::{InstallError, Result};

/// Archive suffix every release asset carries
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// `<binary>-<tag>-<arch>-<os>.tar.gz`
pub fn expected_asset_name(binary_name: &str, tag: &str, triple: &PlatformTriple) -> String {
    format!("{binary_name}-{tag}-{triple}.{ARCHIVE_EXTENSION}")
}

impl ReleaseMetadata {
    /// First asset, in document order, whose name is exactly `expected`
    pub fn select_asset(&self, expected: &str) -> Result<&Asset> {
        let asset = self
            .assets
            .iter()
            .find(|a| a.name == expected)
            .ok_or_else(|| InstallError::AssetNotFound {
                expected: expected.to_string(),
                tag: self.tag_name.clone(),
            })?;
        debug!("Selected asset {} -> {}", asset.name, asset.browser_download_url);
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::platform::HostInfo;

    fn asset(name: &str, url: &str) -> Asset {
        Asset {
            name: name.to_string(),
            browser_download_url: url.to_string(),
        }
    }

    fn triple(os: &str, arch: &str) -> PlatformTriple {
        PlatformTriple::from_host(&HostInfo::new(os, arch)).unwrap()
    }

    fn release() -> ReleaseMetadata {
        ReleaseMetadata {
            tag_name: "v1.2.0".to_string(),
            assets: vec![
                asset("tool-v1.2.0-x86_64-unknown-linux-gnu.tar.gz.sha256", "https://dl/sha"),
                asset("tool-v1.2.0-x86_64-unknown-linux-musl.tar.gz", "https://dl/musl"),
                asset("tool-v1.2.0-x86_64-apple-darwin.tar.gz", "https://dl/darwin"),
                asset("tool-v1.1.0-x86_64-unknown-linux-gnu.tar.gz", "https://dl/old"),
                asset("tool-v1.2.0-x86_64-unknown-linux-gnu.tar.gz", "https://dl/gnu"),
                asset("tool-v1.2.0-x86_64-unknown-linux-gnu.tar.gz", "https://dl/duplicate"),
            ],
        }
    }

    #[test]
    fn builds_expected_name() {
        assert_eq!(
            expected_asset_name("tool", "v1.2.0", &triple("Linux", "x86_64")),
            "tool-v1.2.0-x86_64-unknown-linux-gnu.tar.gz"
        );
    }

    #[test]
    fn exact_match_ignores_decoys_and_takes_first_duplicate() {
        let release = release();
        let expected = expected_asset_name("tool", &release.tag_name, &triple("Linux", "x86_64"));
        let picked = release.select_asset(&expected).unwrap();
        assert_eq!(picked.browser_download_url, "https://dl/gnu");
    }

    #[test]
    fn missing_platform_reports_expected_name() {
        let release = release();
        let expected = expected_asset_name("tool", &release.tag_name, &triple("Darwin", "arm64"));
        match release.select_asset(&expected).unwrap_err() {
            InstallError::AssetNotFound { expected, tag } => {
                assert_eq!(expected, "tool-v1.2.0-aarch64-apple-darwin.tar.gz");
                assert_eq!(tag, "v1.2.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
