//! # scsync-catalog
//!
//! Collaborator contracts for the scsync reconciliation engine.
//!
//! This crate defines the traits the engine talks to and the types that
//! cross them. It does not contain any implementations - those are provided
//! by `scsync-aws` (AWS SDK) and `scsync-memory` (in-memory, for tests).
//!
//! ## Overview
//!
//! - [`CatalogService`]: portfolios, products, provisioning artifacts,
//!   shares and principal associations. Every list operation is exposed one
//!   page at a time; [`collect_pages`] follows the continuation token.
//! - [`ObjectStore`]: template objects and the bucket access policy.
//! - [`IdentityService`]: the caller's own account.
//! - [`JobReporter`]: success/failure signalling back to the pipeline.
//!
//! ## Example
//!
//! ```ignore
//! use scsync_catalog::{CatalogService, CatalogResult, PortfolioSummary, collect_pages};
//!
//! async fn all_portfolios(catalog: &dyn CatalogService) -> CatalogResult<Vec<PortfolioSummary>> {
//!     collect_pages(|token| catalog.list_portfolios_page(token)).await
//! }
//! ```

mod error;
mod pagination;
mod traits;
mod types;

pub use error::{CatalogError, ErrorCategory};
pub use pagination::collect_pages;
pub use traits::{CatalogService, IdentityService, JobReporter, ObjectStore};
pub use types::{
    ArtifactSpec, ObjectLookup, Page, PortfolioSpec, PortfolioSummary, PortfolioUpdate,
    ProductSpec, ProductSummary, Tag,
};

/// Type alias for a collaborator result.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Shareable collaborator handles.
pub type DynCatalog = std::sync::Arc<dyn CatalogService>;
pub type DynObjectStore = std::sync::Arc<dyn ObjectStore>;
pub type DynIdentity = std::sync::Arc<dyn IdentityService>;
pub type DynJobReporter = std::sync::Arc<dyn JobReporter>;
