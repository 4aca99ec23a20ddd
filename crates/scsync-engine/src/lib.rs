//! # scsync-engine
//!
//! Reconciles declarative portfolio manifests against a service catalog.
//!
//! The engine is written against the collaborator traits of `scsync-catalog`
//! and never constructs clients itself; callers inject the AWS adapters from
//! `scsync-aws` or the in-memory backend from `scsync-memory`.
//!
//! ## Example
//!
//! ```ignore
//! use scsync_engine::{CatalogSync, config::CatalogSettings};
//!
//! let sync = CatalogSync::new(catalog, objects, identity, CatalogSettings::default());
//! let report = sync.run(Path::new("./artifact"), "template-bucket").await?;
//! println!("{} uploads", report.uploads());
//! ```

pub mod artifact;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod job;
pub mod lookup;
pub mod observability;
pub mod reconcile;

pub use artifact::{ArtifactSource, extract_artifact};
pub use config::SyncConfig;
pub use discovery::{ManifestSource, discover_manifests};
pub use driver::{CatalogSync, ManifestReport, SyncReport};
pub use error::{SyncError, SyncResult};
pub use job::{JobRequest, JobRunner, JobStatus, UserParameters, decode_job};
