//! Locating manifests inside an extracted artifact.
//!
//! Layout: `<root>/<packages_dir>/<vendor>/<name>mapping.yaml`. Vendors and
//! manifests are visited in name order so passes are reproducible.

use std::path::{Path, PathBuf};

use scsync_core::Manifest;

use crate::config::CatalogSettings;
use crate::error::{SyncError, SyncResult};

/// A parsed manifest and where it came from.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    /// Vendor folder name.
    pub vendor: String,
    /// Manifest file name without the `.yaml` extension.
    pub mapping_base: String,
    pub vendor_dir: PathBuf,
    pub path: PathBuf,
    pub manifest: Manifest,
}

/// Finds, parses and validates every manifest under `root`.
///
/// Every manifest is loaded before any remote call is made, so a malformed
/// file aborts the pass without side effects.
pub fn discover_manifests(root: &Path, settings: &CatalogSettings) -> SyncResult<Vec<ManifestSource>> {
    let packages = root.join(&settings.packages_dir);
    if !packages.is_dir() {
        return Err(SyncError::MissingPackages { path: packages });
    }

    let mut sources = Vec::new();
    for vendor_dir in sorted_entries(&packages)? {
        if !vendor_dir.is_dir() {
            continue;
        }
        let vendor = file_name(&vendor_dir);
        for path in sorted_entries(&vendor_dir)? {
            let name = file_name(&path);
            if !path.is_file() || !name.ends_with(&settings.mapping_suffix) {
                continue;
            }
            let mapping_base = name.strip_suffix(".yaml").unwrap_or(&name).to_string();
            tracing::debug!(vendor = %vendor, manifest = %name, "loading manifest");
            let manifest = Manifest::load(&path)?;
            sources.push(ManifestSource {
                vendor: vendor.clone(),
                mapping_base,
                vendor_dir: vendor_dir.clone(),
                path,
                manifest,
            });
        }
    }

    tracing::info!(count = sources.len(), root = %root.display(), "manifests discovered");
    Ok(sources)
}

fn sorted_entries(dir: &Path) -> SyncResult<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| SyncError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SyncError::io(dir, e))?;
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MANIFEST: &str = "name: Networking\nowner: platform\nproducts:\n  - name: vpc\n    owner: platform\n    template: vpc.yaml\n";

    #[test]
    fn finds_mapping_files_in_order() {
        let root = tempfile::tempdir().unwrap();
        let packages = root.path().join("packages");
        fs::create_dir_all(packages.join("zeta")).unwrap();
        fs::create_dir_all(packages.join("acme")).unwrap();
        fs::write(packages.join("zeta/b-mapping.yaml"), MANIFEST).unwrap();
        fs::write(packages.join("acme/mapping.yaml"), MANIFEST).unwrap();
        fs::write(packages.join("acme/vpc.yaml"), "Resources: {}\n").unwrap();
        fs::write(packages.join("README.md"), "ignored").unwrap();

        let sources = discover_manifests(root.path(), &CatalogSettings::default()).unwrap();

        let found: Vec<(&str, &str)> = sources
            .iter()
            .map(|s| (s.vendor.as_str(), s.mapping_base.as_str()))
            .collect();
        assert_eq!(found, vec![("acme", "mapping"), ("zeta", "b-mapping")]);
    }

    #[test]
    fn missing_packages_dir_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let err = discover_manifests(root.path(), &CatalogSettings::default()).unwrap_err();
        assert!(matches!(err, SyncError::MissingPackages { .. }));
    }

    #[test]
    fn invalid_manifest_aborts_discovery() {
        let root = tempfile::tempdir().unwrap();
        let vendor = root.path().join("packages/acme");
        fs::create_dir_all(&vendor).unwrap();
        fs::write(vendor.join("mapping.yaml"), "name: ''\nproducts: []\n").unwrap();

        let err = discover_manifests(root.path(), &CatalogSettings::default()).unwrap_err();
        assert!(err.is_input_error());
    }
}
