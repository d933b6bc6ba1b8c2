//! Per-run scratch directory
//!
//! The directory lives exactly as long as its [`ScratchSpace`] value. Dropping
//! it removes the tree, so every early return, error, or cancelled future
//! cleans up without a global hook.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::{InstallError, Result};

const SCRATCH_PREFIX: &str = "code-marshal-install.";

/// Uniquely named temporary directory owned by one install run
#[derive(Debug)]
pub struct ScratchSpace {
    dir: Option<TempDir>,
}

impl ScratchSpace {
    /// Create under the system temp directory
    pub fn create() -> Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create under `root`
    pub fn create_in(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(root)
            .map_err(|e| InstallError::io("failed to create scratch directory", root, e))?;
        debug!("Created scratch directory {}", dir.path().display());
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Path of `name` inside the scratch directory
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path().join(name)
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!("Removed scratch directory {}", path.display()),
                Err(e) => warn!("Failed to remove scratch directory {}: {e}", path.display()),
            }
        }
    }
}
