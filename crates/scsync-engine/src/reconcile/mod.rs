//! Reconciliation steps for a single manifest.
//!
//! Each step reads the current remote state, compares it with the manifest
//! and issues the mutating calls needed to converge:
//! - portfolio metadata and tags
//! - principal associations (full replace)
//! - portfolio shares (diffed)
//! - the bucket-policy statement granting template reads
//! - products and their provisioning artifacts

mod change;
mod policy;
mod portfolio;
mod principals;
mod products;
mod shares;

pub use change::{ChangeCheck, has_changed};
pub use policy::{PolicyOutcome, apply_bucket_policy};
pub use portfolio::{PortfolioOutcome, ensure_portfolio};
pub use principals::{PrincipalChanges, reconcile_principals};
pub use products::{ProductAction, ProductContext, ProductOutcome, reconcile_product};
pub use shares::{ShareChanges, reconcile_shares};
