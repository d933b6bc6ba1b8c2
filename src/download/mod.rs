//! GitHub release resolution, asset download and extraction
//!
//! ## Module Organization
//!
//! - `platform` - Host detection and target-triple mapping
//! - `github` - GitHub API interaction for release discovery
//! - `asset` - Expected asset name and selection
//! - `fetch` - Archive download through curl or wget
//! - `extract` - Archive unpacking and binary lookup

pub mod asset;
pub mod extract;
pub mod fetch;
pub mod github;
pub mod platform;

// Re-export public API
pub use asset::expected_asset_name;
pub use fetch::FetchStrategy;
pub use github::{Asset, ReleaseClient, ReleaseMetadata};
pub use platform::{HostInfo, PlatformTriple};
