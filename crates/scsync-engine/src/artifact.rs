//! Pipeline artifact handling.
//!
//! The pipeline hands over a zip archive holding the `packages/` tree. It is
//! unpacked into a temporary directory that is removed when the
//! [`ArtifactSource`] is dropped.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{SyncError, SyncResult};

/// A local tree the driver can read manifests from.
#[derive(Debug)]
pub enum ArtifactSource {
    /// An existing directory, used as-is.
    Directory(PathBuf),
    /// An unpacked archive, deleted on drop.
    Extracted(TempDir),
}

impl ArtifactSource {
    pub fn root(&self) -> &Path {
        match self {
            Self::Directory(path) => path,
            Self::Extracted(dir) => dir.path(),
        }
    }

    /// Opens a directory as-is, or unpacks a zip file.
    pub fn open(path: &Path) -> SyncResult<Self> {
        if path.is_dir() {
            return Ok(Self::Directory(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|e| SyncError::io(path, e))?;
        Self::from_zip_bytes(&bytes)
    }

    /// Unpacks an in-memory zip archive into a fresh temporary directory.
    pub fn from_zip_bytes(bytes: &[u8]) -> SyncResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("scsync-artifact-")
            .tempdir()
            .map_err(|e| SyncError::io(std::env::temp_dir(), e))?;
        let files = extract_artifact(bytes, dir.path())?;
        tracing::debug!(files, dest = %dir.path().display(), "artifact extracted");
        Ok(Self::Extracted(dir))
    }
}

/// Unpacks a zip archive below `dest` and returns the number of files written.
///
/// Entries whose names would resolve outside `dest` are rejected.
pub fn extract_artifact(bytes: &[u8], dest: &Path) -> SyncResult<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SyncError::Artifact(format!("failed to read zip archive: {e}")))?;

    let mut files = 0;
    for idx in 0..archive.len() {
        let mut entry = archive
            .by_index(idx)
            .map_err(|e| SyncError::Artifact(format!("failed to read zip entry {idx}: {e}")))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(SyncError::Artifact(format!(
                "zip entry '{}' escapes the extraction directory",
                entry.name()
            )));
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| SyncError::io(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }

        let mut body = Vec::new();
        entry
            .read_to_end(&mut body)
            .map_err(|e| SyncError::Artifact(format!("failed to read zip entry {}: {e}", entry.name())))?;
        fs::write(&target, body).map_err(|e| SyncError::io(&target, e))?;
        files += 1;
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};
    use zip::CompressionMethod;

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn extracts_nested_entries() {
        let bytes = zip_bytes(&[
            ("packages/acme/mapping.yaml", "name: Networking\nowner: platform\nproducts: []\n"),
            ("packages/acme/vpc.yaml", "Resources: {}\n"),
        ]);

        let source = ArtifactSource::from_zip_bytes(&bytes).unwrap();
        let root = source.root();
        assert!(root.join("packages/acme/mapping.yaml").is_file());
        assert_eq!(
            fs::read_to_string(root.join("packages/acme/vpc.yaml")).unwrap(),
            "Resources: {}\n"
        );
    }

    #[test]
    fn rejects_escaping_entries() {
        let bytes = zip_bytes(&[("../evil.yaml", "x")]);
        let dest = tempfile::tempdir().unwrap();
        let err = extract_artifact(&bytes, dest.path()).unwrap_err();
        assert!(matches!(err, SyncError::Artifact(_)));
    }

    #[test]
    fn rejects_non_zip_input() {
        let dest = tempfile::tempdir().unwrap();
        let err = extract_artifact(b"definitely not a zip", dest.path()).unwrap_err();
        assert!(matches!(err, SyncError::Artifact(_)));
    }

    #[test]
    fn directories_are_used_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let source = ArtifactSource::open(dir.path()).unwrap();
        assert_eq!(source.root(), dir.path());
    }
}
