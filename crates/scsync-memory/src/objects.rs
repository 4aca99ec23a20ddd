use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use scsync_catalog::{CatalogError, CatalogResult, ObjectLookup, ObjectStore};
use scsync_core::digest_bytes;
use tokio::sync::RwLock;

/// A mutating call received by [`InMemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectCall {
    PutObject { bucket: String, key: String },
    PutBucketPolicy { bucket: String },
}

#[derive(Debug, Default)]
struct ObjectState {
    objects: HashMap<(String, String), Vec<u8>>,
    policies: HashMap<String, String>,
    journal: Vec<ObjectCall>,
}

/// In-memory object store. Entity tags are the MD5 of the stored body.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    state: RwLock<ObjectState>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object without recording a call.
    pub async fn insert_object(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.state
            .write()
            .await
            .objects
            .insert((bucket.to_string(), key.to_string()), body.into());
    }

    /// Sets a bucket policy without recording a call.
    pub async fn set_policy(&self, bucket: &str, policy: &str) {
        self.state
            .write()
            .await
            .policies
            .insert(bucket.to_string(), policy.to_string());
    }

    pub async fn policy(&self, bucket: &str) -> Option<String> {
        self.state.read().await.policies.get(bucket).cloned()
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .await
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys stored in a bucket, sorted.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let state = self.state.read().await;
        let mut keys: Vec<String> = state
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    pub async fn journal(&self) -> Vec<ObjectCall> {
        self.state.read().await.journal.clone()
    }

    pub async fn clear_journal(&self) {
        self.state.write().await.journal.clear();
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> CatalogResult<ObjectLookup> {
        let state = self.state.read().await;
        Ok(state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .map_or(ObjectLookup::NotFound, |body| {
                ObjectLookup::Found(digest_bytes(body))
            }))
    }

    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> CatalogResult<()> {
        let body = tokio::fs::read(path).await?;
        let mut state = self.state.write().await;
        state
            .objects
            .insert((bucket.to_string(), key.to_string()), body);
        state.journal.push(ObjectCall::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        tracing::debug!(bucket, key, "in-memory object stored");
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> CatalogResult<Vec<u8>> {
        self.object(bucket, key)
            .await
            .ok_or_else(|| CatalogError::not_found("object", format!("{bucket}/{key}")))
    }

    async fn get_bucket_policy(&self, bucket: &str) -> CatalogResult<Option<String>> {
        Ok(self.policy(bucket).await)
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        state
            .policies
            .insert(bucket.to_string(), policy.to_string());
        state.journal.push(ObjectCall::PutBucketPolicy {
            bucket: bucket.to_string(),
        });
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn head_missing_object_is_not_found() {
        let store = InMemoryObjectStore::new();
        let lookup = store.head_object("b", "missing").await.unwrap();
        assert_eq!(lookup, ObjectLookup::NotFound);
    }

    #[tokio::test]
    async fn head_reports_md5_of_body() {
        let store = InMemoryObjectStore::new();
        store.insert_object("b", "k", "hello world").await;
        let lookup = store.head_object("b", "k").await.unwrap();
        match lookup {
            ObjectLookup::Found(digest) => {
                assert_eq!(digest.as_str(), "5eb63bbbe01eeed093cb22bb8f5acdc3")
            }
            ObjectLookup::NotFound => panic!("object should exist"),
        }
    }

    #[tokio::test]
    async fn put_from_file_records_call() {
        let store = InMemoryObjectStore::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"body").unwrap();

        store
            .put_object_from_file("b", "t/x.yaml", file.path())
            .await
            .unwrap();

        assert_eq!(store.object("b", "t/x.yaml").await.unwrap(), b"body");
        assert_eq!(
            store.journal().await,
            vec![ObjectCall::PutObject {
                bucket: "b".into(),
                key: "t/x.yaml".into()
            }]
        );
    }

    #[tokio::test]
    async fn missing_policy_is_none() {
        let store = InMemoryObjectStore::new();
        assert!(store.get_bucket_policy("b").await.unwrap().is_none());
        store.put_bucket_policy("b", "{}").await.unwrap();
        assert_eq!(store.get_bucket_policy("b").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn get_missing_object_fails() {
        let store = InMemoryObjectStore::new();
        assert!(store.get_object("b", "k").await.unwrap_err().is_not_found());
    }
}
