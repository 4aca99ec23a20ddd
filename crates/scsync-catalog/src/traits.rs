//! Collaborator traits.
//!
//! Implementations must be thread-safe (`Send + Sync`). The engine awaits
//! every call before issuing the next one; nothing here is expected to be
//! called concurrently for the same portfolio.

use std::path::Path;

use async_trait::async_trait;
use scsync_core::AccountId;

use crate::CatalogResult;
use crate::types::{
    ArtifactSpec, ObjectLookup, Page, PortfolioSpec, PortfolioSummary, PortfolioUpdate,
    ProductSpec, ProductSummary, Tag,
};

/// The service-catalog management API.
#[async_trait]
pub trait CatalogService: Send + Sync {
    // ==================== Listing ====================

    /// Lists one page of portfolios owned by the caller.
    async fn list_portfolios_page(
        &self,
        page_token: Option<String>,
    ) -> CatalogResult<Page<PortfolioSummary>>;

    /// Lists one page of products associated with a portfolio.
    async fn list_products_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<ProductSummary>>;

    /// Lists one page of account ids the portfolio is shared with.
    async fn list_shares_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<String>>;

    /// Lists one page of principal ARNs associated with the portfolio.
    async fn list_principals_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<String>>;

    /// Returns the tags currently set on a portfolio.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the portfolio does not exist.
    async fn portfolio_tags(&self, portfolio_id: &str) -> CatalogResult<Vec<Tag>>;

    // ==================== Portfolios ====================

    /// Creates a portfolio and returns it.
    async fn create_portfolio(&self, spec: &PortfolioSpec) -> CatalogResult<PortfolioSummary>;

    /// Updates description, provider and tags of a portfolio.
    ///
    /// Tag removals are applied before additions.
    async fn update_portfolio(&self, update: &PortfolioUpdate) -> CatalogResult<()>;

    // ==================== Access ====================

    async fn create_portfolio_share(&self, portfolio_id: &str, account_id: &str)
    -> CatalogResult<()>;

    async fn delete_portfolio_share(&self, portfolio_id: &str, account_id: &str)
    -> CatalogResult<()>;

    async fn associate_principal(&self, portfolio_id: &str, principal_arn: &str)
    -> CatalogResult<()>;

    async fn disassociate_principal(
        &self,
        portfolio_id: &str,
        principal_arn: &str,
    ) -> CatalogResult<()>;

    // ==================== Products ====================

    /// Creates a product with its initial provisioning artifact.
    async fn create_product(&self, spec: &ProductSpec) -> CatalogResult<ProductSummary>;

    async fn associate_product(&self, product_id: &str, portfolio_id: &str) -> CatalogResult<()>;

    /// Registers a new provisioning artifact (version) and returns its id.
    async fn create_provisioning_artifact(
        &self,
        product_id: &str,
        artifact: &ArtifactSpec,
    ) -> CatalogResult<String>;

    // ==================== Metadata ====================

    /// Returns the name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}

/// Object storage holding template bodies, pipeline artifacts and the bucket policy.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Looks up an object's entity tag.
    ///
    /// A missing object is `Ok(ObjectLookup::NotFound)`, not an error.
    async fn head_object(&self, bucket: &str, key: &str) -> CatalogResult<ObjectLookup>;

    /// Uploads a local file.
    async fn put_object_from_file(&self, bucket: &str, key: &str, path: &Path)
    -> CatalogResult<()>;

    /// Downloads an object body.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the object does not exist.
    async fn get_object(&self, bucket: &str, key: &str) -> CatalogResult<Vec<u8>>;

    /// Returns the bucket policy JSON, or `None` when the bucket has none.
    async fn get_bucket_policy(&self, bucket: &str) -> CatalogResult<Option<String>>;

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> CatalogResult<()>;

    /// Returns the name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}

/// Identity of the caller.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// The account the catalog belongs to.
    async fn caller_account(&self) -> CatalogResult<AccountId>;
}

/// Signals the outcome of a pipeline job.
#[async_trait]
pub trait JobReporter: Send + Sync {
    async fn put_job_success(&self, job_id: &str, message: &str) -> CatalogResult<()>;

    async fn put_job_failure(&self, job_id: &str, message: &str) -> CatalogResult<()>;
}
