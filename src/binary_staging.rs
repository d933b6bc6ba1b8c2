//! Placing the extracted binary into the install prefix
//!
//! The binary is copied next to its final location under a temporary name,
//! made executable, and renamed over the target. A rename within one
//! directory is atomic, so the target is never observed half written.

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallError, Result};

/// Refuse to replace an existing install unless overwrite was requested
///
/// Read-only: performs no filesystem writes either way.
pub fn check_existing(target: &Path, overwrite: bool) -> Result<()> {
    // symlink_metadata, not exists(), so a dangling symlink still counts
    if fs::symlink_metadata(target).is_ok() {
        if !overwrite {
            return Err(InstallError::ExistingInstallConflict(target.to_path_buf()));
        }
        info!("Overwriting existing {}", target.display());
    }
    Ok(())
}

/// Install `binary` as `<prefix>/<binary_name>` with mode 0755
pub fn install_binary(binary: &Path, prefix: &Path, binary_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(prefix)
        .map_err(|e| InstallError::io("failed to create install directory", prefix, e))?;

    let dest_path = prefix.join(binary_name);
    let staged = prefix.join(format!(".{binary_name}.install-{}", std::process::id()));

    if let Err(e) = stage_and_swap(binary, &staged, &dest_path) {
        if staged.exists()
            && let Err(cleanup) = fs::remove_file(&staged)
        {
            warn!("Failed to remove staged file {}: {cleanup}", staged.display());
        }
        return Err(e);
    }

    info!("Installed {}", dest_path.display());
    Ok(dest_path)
}

fn stage_and_swap(binary: &Path, staged: &Path, dest_path: &Path) -> Result<()> {
    fs::copy(binary, staged)
        .map_err(|e| InstallError::io("failed to copy binary into place", staged, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        // Set executable permissions (755)
        let mut perms = fs::metadata(staged)
            .map_err(|e| InstallError::io("failed to read metadata", staged, e))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(staged, perms)
            .map_err(|e| InstallError::io("failed to set permissions", staged, e))?;
    }

    fs::rename(staged, dest_path)
        .map_err(|e| InstallError::io("failed to move binary into place", dest_path, e))
}
