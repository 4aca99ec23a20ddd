//! Content-hash change detection for stored templates.

use std::path::Path;

use scsync_catalog::{ObjectLookup, ObjectStore};
use scsync_core::{ContentDigest, digest};

use crate::error::SyncResult;

/// Outcome of comparing a local template with the stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCheck {
    /// `true` when the local file must be uploaded.
    pub changed: bool,
    /// Local digest; `None` when the remote object is absent.
    pub local: Option<ContentDigest>,
    /// Remote entity tag; `None` when the remote object is absent.
    pub remote: Option<ContentDigest>,
}

/// Compares `local_path` against the object stored at `bucket`/`key`.
///
/// An absent object means the content must be uploaded. Equal digests mean
/// nothing changed. Storage errors other than absence propagate.
pub async fn has_changed(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    local_path: &Path,
) -> SyncResult<ChangeCheck> {
    tracing::debug!(bucket, key, "looking up stored template");
    let remote = match store.head_object(bucket, key).await? {
        ObjectLookup::Found(remote) => remote,
        ObjectLookup::NotFound => {
            tracing::debug!(key, "stored template not found, change needed");
            return Ok(ChangeCheck {
                changed: true,
                local: None,
                remote: None,
            });
        }
    };

    let local = digest(local_path)?;
    let changed = local != remote;
    if changed {
        tracing::debug!(key, local = %local, remote = %remote, "template digests differ");
    } else {
        tracing::debug!(key, digest = %local, "template digests equal");
    }

    Ok(ChangeCheck {
        changed,
        local: Some(local),
        remote: Some(remote),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scsync_memory::InMemoryObjectStore;
    use std::io::Write;

    fn template(body: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body).unwrap();
        file
    }

    #[tokio::test]
    async fn absent_object_needs_upload() {
        let store = InMemoryObjectStore::new();
        let file = template(b"Resources: {}\n");

        let check = has_changed(&store, "b", "k", file.path()).await.unwrap();
        assert_eq!(
            check,
            ChangeCheck {
                changed: true,
                local: None,
                remote: None
            }
        );
    }

    #[tokio::test]
    async fn identical_content_is_unchanged() {
        let store = InMemoryObjectStore::new();
        store.insert_object("b", "k", "Resources: {}\n").await;
        let file = template(b"Resources: {}\n");

        let check = has_changed(&store, "b", "k", file.path()).await.unwrap();
        assert!(!check.changed);
        assert_eq!(check.local, check.remote);
        assert!(check.local.is_some());
    }

    #[tokio::test]
    async fn differing_content_is_changed() {
        let store = InMemoryObjectStore::new();
        store.insert_object("b", "k", "Resources: {}\n").await;
        let file = template(b"Resources:\n  Vpc: {}\n");

        let check = has_changed(&store, "b", "k", file.path()).await.unwrap();
        assert!(check.changed);
        assert_ne!(check.local, check.remote);
        assert!(check.local.is_some() && check.remote.is_some());
    }
}
