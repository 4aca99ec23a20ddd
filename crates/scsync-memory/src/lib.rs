//! In-memory collaborator backend for scsync.
//!
//! This crate implements every trait from `scsync-catalog` on top of plain
//! collections behind `tokio::sync::RwLock`. Mutating calls are recorded in a
//! journal so tests can assert exactly which remote calls a pass issued.
//!
//! # Example
//!
//! ```ignore
//! use scsync_memory::MemoryBackend;
//!
//! let owner = AccountId::parse("999999999999").unwrap();
//! let backend = MemoryBackend::new(owner).with_page_size(2);
//! let portfolio_id = backend.catalog.seed_portfolio("Networking").await;
//! backend.catalog.seed_share(&portfolio_id, "222222222222").await;
//! ```

mod catalog;
mod identity;
mod objects;

use std::sync::Arc;

use scsync_core::AccountId;

pub use catalog::{CatalogCall, InMemoryCatalog};
pub use identity::{JobOutcome, RecordingJobReporter, StaticIdentity};
pub use objects::{InMemoryObjectStore, ObjectCall};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Every in-memory collaborator, wired to the same owner account.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    pub catalog: Arc<InMemoryCatalog>,
    pub objects: Arc<InMemoryObjectStore>,
    pub identity: Arc<StaticIdentity>,
    pub jobs: Arc<RecordingJobReporter>,
}

impl MemoryBackend {
    /// Creates a backend owned by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalog::new()),
            objects: Arc::new(InMemoryObjectStore::new()),
            identity: Arc::new(StaticIdentity::new(owner)),
            jobs: Arc::new(RecordingJobReporter::new()),
        }
    }

    /// Sets the page size of every catalog listing.
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalog::with_page_size(page_size)),
            ..self
        }
    }
}
