use std::path::Path;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::operation::get_bucket_policy::GetBucketPolicyError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::error::ProvideErrorMetadata;
use scsync_catalog::{CatalogError, CatalogResult, ObjectLookup, ObjectStore};
use scsync_core::ContentDigest;

use crate::error::{missing_field, remote_error};

/// Error code S3 returns for a bucket without a policy.
const NO_SUCH_BUCKET_POLICY: &str = "NoSuchBucketPolicy";

/// S3-backed object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk: &SdkConfig, path_style: bool) -> Self {
        let config = aws_sdk_s3::config::Builder::from(sdk)
            .force_path_style(path_style)
            .build();
        Self::new(Client::from_conf(config))
    }
}

fn is_missing_policy(err: &GetBucketPolicyError) -> bool {
    err.code() == Some(NO_SUCH_BUCKET_POLICY)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> CatalogResult<ObjectLookup> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(output) => output
                .e_tag()
                .map(|etag| ObjectLookup::Found(ContentDigest::from_etag(etag)))
                .ok_or_else(|| missing_field("HeadObject", "ETag")),
            Err(err) => {
                if err.as_service_error().is_some_and(HeadObjectError::is_not_found) {
                    tracing::debug!(bucket, key, "object not found");
                    return Ok(ObjectLookup::NotFound);
                }
                Err(remote_error("HeadObject", err))
            }
        }
    }

    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> CatalogResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| CatalogError::Io(std::io::Error::other(e)))?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| remote_error("PutObject", e))?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> CatalogResult<Vec<u8>> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(err) => {
                if err.as_service_error().is_some_and(GetObjectError::is_no_such_key) {
                    return Err(CatalogError::not_found("object", format!("{bucket}/{key}")));
                }
                return Err(remote_error("GetObject", err));
            }
        };
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| remote_error("GetObject", e))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> CatalogResult<Option<String>> {
        match self.client.get_bucket_policy().bucket(bucket).send().await {
            Ok(output) => Ok(output.policy().map(str::to_string)),
            Err(err) => {
                if err.as_service_error().is_some_and(is_missing_policy) {
                    return Ok(None);
                }
                Err(remote_error("GetBucketPolicy", err))
            }
        }
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> CatalogResult<()> {
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| remote_error("PutBucketPolicy", e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::error::ErrorMetadata;

    #[test]
    fn missing_policy_code_is_recognised() {
        let err = GetBucketPolicyError::generic(
            ErrorMetadata::builder().code(NO_SUCH_BUCKET_POLICY).build(),
        );
        assert!(is_missing_policy(&err));

        let err = GetBucketPolicyError::generic(ErrorMetadata::builder().code("AccessDenied").build());
        assert!(!is_missing_policy(&err));
    }
}
