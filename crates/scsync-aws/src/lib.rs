//! AWS implementations of the scsync collaborator traits.
//!
//! - [`ServiceCatalogClient`]: Service Catalog admin API
//! - [`S3ObjectStore`]: template objects, artifacts and the bucket policy
//! - [`StsIdentity`]: the caller account from `GetCallerIdentity`
//! - [`CodePipelineReporter`]: job success/failure results
//!
//! All clients share one `SdkConfig` resolved through the default provider
//! chain, optionally pinned to a region and endpoint.

mod catalog;
mod error;
mod identity;
mod jobs;
mod objects;

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub use catalog::ServiceCatalogClient;
pub use identity::StsIdentity;
pub use jobs::CodePipelineReporter;
pub use objects::S3ObjectStore;

/// Connection overrides applied on top of the default provider chain.
#[derive(Debug, Clone, Default)]
pub struct AwsOptions {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Resolves credentials and region for every client.
pub async fn load_sdk_config(options: &AwsOptions) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &options.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &options.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

/// Every AWS collaborator built from one configuration.
#[derive(Debug, Clone)]
pub struct AwsBackend {
    pub catalog: Arc<ServiceCatalogClient>,
    pub objects: Arc<S3ObjectStore>,
    pub identity: Arc<StsIdentity>,
    pub jobs: Arc<CodePipelineReporter>,
}

impl AwsBackend {
    pub async fn connect(options: &AwsOptions) -> Self {
        let sdk = load_sdk_config(options).await;
        tracing::debug!(
            region = ?sdk.region(),
            endpoint = ?options.endpoint_url,
            "AWS configuration loaded"
        );
        Self::from_sdk_config(&sdk, options.endpoint_url.is_some())
    }

    /// Builds clients from an already loaded configuration.
    ///
    /// A custom endpoint usually means an emulator, so S3 then uses
    /// path-style addressing.
    pub fn from_sdk_config(sdk: &SdkConfig, path_style: bool) -> Self {
        Self {
            catalog: Arc::new(ServiceCatalogClient::new(aws_sdk_servicecatalog::Client::new(sdk))),
            objects: Arc::new(S3ObjectStore::from_sdk_config(sdk, path_style)),
            identity: Arc::new(StsIdentity::new(aws_sdk_sts::Client::new(sdk))),
            jobs: Arc::new(CodePipelineReporter::new(aws_sdk_codepipeline::Client::new(sdk))),
        }
    }
}
