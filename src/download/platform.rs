//! Platform detection for release asset selection
//!
//! Maps the raw `uname` system name and machine to the Rust target-triple
//! spelling used in release asset names (`x86_64-unknown-linux-gnu`, ...).

use log::debug;
use once_cell::sync::OnceCell;
use std::fmt;

use crate::error::{InstallError, Result};

/// Raw host identification, as reported by `uname(2)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

impl HostInfo {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }
}

/// Global cache for host detection (initialized once, used everywhere)
static HOST_CACHE: OnceCell<HostInfo> = OnceCell::new();

impl HostInfo {
    /// Detect the running host (cached after first call)
    pub fn detect() -> Result<Self> {
        HOST_CACHE.get_or_try_init(Self::detect_uncached).cloned()
    }

    fn detect_uncached() -> Result<Self> {
        let uts = nix::sys::utsname::uname()
            .map_err(|e| InstallError::UnknownPlatform(format!("uname failed: {e}")))?;
        let host = Self::new(
            uts.sysname().to_string_lossy(),
            uts.machine().to_string_lossy(),
        );
        debug!("Host reports {} / {}", host.os, host.arch);
        Ok(host)
    }
}

/// Canonical `<arch>-<os>` target used in asset names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTriple {
    pub arch: &'static str,
    pub os: &'static str,
}

/// OS name prefixes of the Windows POSIX layers
const WINDOWS_PREFIXES: &[&str] = &["mingw", "msys", "cygwin"];

impl PlatformTriple {
    /// Map raw host strings; unsupported or unknown pairs are terminal errors
    pub fn from_host(host: &HostInfo) -> Result<Self> {
        let os_lower = host.os.trim().to_ascii_lowercase();
        let os = match os_lower.as_str() {
            "linux" => "unknown-linux-gnu",
            "darwin" => "apple-darwin",
            other if WINDOWS_PREFIXES.iter().any(|p| other.starts_with(p)) => {
                return Err(InstallError::UnsupportedPlatform(host.os.clone()));
            }
            _ => return Err(InstallError::UnknownPlatform(host.os.clone())),
        };
        let arch = match host.arch.trim() {
            "x86_64" | "amd64" => "x86_64",
            "arm64" | "aarch64" => "aarch64",
            _ => return Err(InstallError::UnsupportedArchitecture(host.arch.clone())),
        };
        Ok(Self { arch, os })
    }
}

impl fmt::Display for PlatformTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(os: &str, arch: &str) -> Result<String> {
        PlatformTriple::from_host(&HostInfo::new(os, arch)).map(|t| t.to_string())
    }

    #[test]
    fn supported_pairs_map_to_triples() {
        let table = [
            ("Linux", "x86_64", "x86_64-unknown-linux-gnu"),
            ("linux", "amd64", "x86_64-unknown-linux-gnu"),
            ("Linux", "aarch64", "aarch64-unknown-linux-gnu"),
            ("Linux", "arm64", "aarch64-unknown-linux-gnu"),
            ("Darwin", "x86_64", "x86_64-apple-darwin"),
            ("Darwin", "arm64", "aarch64-apple-darwin"),
            ("darwin", "aarch64", "aarch64-apple-darwin"),
        ];
        for (os, arch, expected) in table {
            assert_eq!(triple(os, arch).unwrap(), expected, "{os}/{arch}");
        }
    }

    #[test]
    fn windows_layers_are_unsupported() {
        for os in ["MINGW64_NT-10.0", "MSYS_NT-10.0", "CYGWIN_NT-10.0", "mingw32"] {
            let err = triple(os, "x86_64").unwrap_err();
            assert!(matches!(err, InstallError::UnsupportedPlatform(_)), "{os}");
        }
    }

    #[test]
    fn other_systems_are_unknown() {
        for os in ["FreeBSD", "SunOS", "Windows_NT", ""] {
            let err = triple(os, "x86_64").unwrap_err();
            assert!(matches!(err, InstallError::UnknownPlatform(_)), "{os}");
        }
    }

    #[test]
    fn other_architectures_are_unsupported() {
        for arch in ["i686", "armv7l", "riscv64", "ppc64le"] {
            let err = triple("Linux", arch).unwrap_err();
            match err {
                InstallError::UnsupportedArchitecture(a) => assert_eq!(a, arch),
                other => panic!("unexpected error for {arch}: {other}"),
            }
        }
    }

    #[test]
    fn current_host_is_detected() {
        let host = HostInfo::detect().unwrap();
        assert!(!host.os.is_empty());
        assert!(!host.arch.is_empty());
    }
}
