//! External tool detection
//!
//! Archive handling, scratch directories and response decoding all happen
//! in-process, so the only tools probed on `PATH` are the HTTP fetch utilities.
//! The first one found picks the download strategy.

use log::debug;
use std::path::PathBuf;

use crate::download::FetchStrategy;
use crate::error::{InstallError, Result};

/// Fetch utilities in probe order
pub const FETCH_TOOLS: &[&str] = &["curl", "wget"];

/// Probe `PATH` for a fetch utility
pub fn check_capabilities() -> Result<FetchStrategy> {
    check_capabilities_with(|tool| which::which(tool).ok())
}

/// Probe with a custom locator (the order of [`FETCH_TOOLS`] is preserved)
pub fn check_capabilities_with<F>(locate: F) -> Result<FetchStrategy>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    for &tool in FETCH_TOOLS {
        if let Some(program) = locate(tool) {
            debug!("Using {} for downloads", program.display());
            return Ok(match tool {
                "curl" => FetchStrategy::Curl { program },
                _ => FetchStrategy::Wget { program },
            });
        }
    }
    Err(InstallError::MissingDependency(FETCH_TOOLS.join(" or ")))
}
