//! Release archive extraction
//!
//! Unpacks a `.tar.gz` into the scratch directory and checks that the
//! expected executable sits at the archive root.

use flate2::read::GzDecoder;
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Archive;

use crate::error::{InstallError, Result};

/// Unpack `archive` into `dest` (created if missing)
pub async fn unpack_archive(archive: &Path, dest: &Path) -> Result<()> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    // Wrap CPU-bound tar extraction in spawn_blocking
    let task_dest = dest.clone();
    tokio::task::spawn_blocking(move || unpack_blocking(&archive, &task_dest))
        .await
        .map_err(|e| {
            InstallError::io("archive extraction task failed", dest, std::io::Error::other(e))
        })?
}

fn unpack_blocking(archive: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .map_err(|e| InstallError::io("failed to create extraction directory", dest, e))?;
    let file =
        File::open(archive).map_err(|e| InstallError::io("failed to open archive", archive, e))?;

    // `unpack` refuses entries that would escape `dest`
    Archive::new(GzDecoder::new(file))
        .unpack(dest)
        .map_err(|e| InstallError::io("failed to extract archive", archive, e))?;
    debug!("Extracted {} into {}", archive.display(), dest.display());
    Ok(())
}

/// The regular file `<root>/<binary_name>`, or `ArchiveContentsInvalid`
pub fn locate_binary(root: &Path, binary_name: &str) -> Result<PathBuf> {
    let candidate = root.join(binary_name);
    match std::fs::symlink_metadata(&candidate) {
        Ok(meta) if meta.file_type().is_file() => Ok(candidate),
        _ => Err(InstallError::ArchiveContentsInvalid {
            binary: binary_name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn write_archive(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, data.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[tokio::test]
    async fn finds_binary_at_archive_root() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("tool.tar.gz");
        write_archive(&archive, &[("tool", "#!/bin/sh\necho tool\n"), ("README.md", "docs")]);

        let out = dir.path().join("extracted");
        unpack_archive(&archive, &out).await.unwrap();
        let binary = locate_binary(&out, "tool").unwrap();
        assert_eq!(binary, out.join("tool"));
        assert_eq!(std::fs::read(binary).unwrap(), b"#!/bin/sh\necho tool\n");
    }

    #[tokio::test]
    async fn nested_binary_is_not_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("tool.tar.gz");
        write_archive(&archive, &[("tool-v1.2.0/tool", "bin")]);

        let out = dir.path().join("extracted");
        unpack_archive(&archive, &out).await.unwrap();
        let err = locate_binary(&out, "tool").unwrap_err();
        assert!(matches!(err, InstallError::ArchiveContentsInvalid { .. }));
    }

    #[tokio::test]
    async fn directory_named_like_binary_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("extracted");
        std::fs::create_dir_all(out.join("tool")).unwrap();
        assert!(locate_binary(&out, "tool").is_err());
    }

    #[tokio::test]
    async fn corrupt_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("tool.tar.gz");
        std::fs::write(&archive, b"this is not gzip").unwrap();
        let err = unpack_archive(&archive, &dir.path().join("extracted")).await.unwrap_err();
        assert!(matches!(err, InstallError::Io { .. }));
    }
}
