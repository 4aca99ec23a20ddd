//! The reconciliation driver.
//!
//! For every manifest, in discovery order:
//!
//! ```text
//! LOOKUP_PORTFOLIO -> CREATE_PORTFOLIO | UPDATE_PORTFOLIO
//!   -> RECONCILE_PRINCIPALS
//!   -> RECONCILE_PRODUCTS (CREATE_PRODUCT | UPDATE_ARTIFACT | SKIP per product)
//!   -> RECONCILE_POLICY -> RECONCILE_SHARES -> DONE
//! ```
//!
//! Calls are issued one at a time. The first error aborts the pass; whatever
//! was applied before it stays applied.

use std::path::Path;

use scsync_catalog::{DynCatalog, DynIdentity, DynObjectStore};
use scsync_core::AccountId;

use crate::config::CatalogSettings;
use crate::discovery::{ManifestSource, discover_manifests};
use crate::error::SyncResult;
use crate::lookup::list_products_for_portfolio;
use crate::reconcile::{
    ProductAction, ProductContext, apply_bucket_policy, ensure_portfolio, reconcile_principals,
    reconcile_product, reconcile_shares,
};

/// What one manifest changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestReport {
    pub portfolio: String,
    pub portfolio_id: String,
    pub portfolio_created: bool,
    pub products_created: Vec<String>,
    pub products_updated: Vec<String>,
    pub products_skipped: Vec<String>,
    /// Object keys uploaded for this manifest.
    pub uploads: Vec<String>,
    pub shares_added: Vec<String>,
    pub shares_removed: Vec<String>,
    pub principals_associated: Vec<String>,
    pub policy_statement_appended: bool,
}

/// What a whole pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub manifests: Vec<ManifestReport>,
}

impl SyncReport {
    pub fn uploads(&self) -> usize {
        self.manifests.iter().map(|m| m.uploads.len()).sum()
    }

    pub fn products_created(&self) -> usize {
        self.manifests.iter().map(|m| m.products_created.len()).sum()
    }

    pub fn products_updated(&self) -> usize {
        self.manifests.iter().map(|m| m.products_updated.len()).sum()
    }
}

/// Reconciles manifests against the catalog through injected collaborators.
#[derive(Clone)]
pub struct CatalogSync {
    catalog: DynCatalog,
    objects: DynObjectStore,
    identity: DynIdentity,
    settings: CatalogSettings,
}

impl CatalogSync {
    pub fn new(
        catalog: DynCatalog,
        objects: DynObjectStore,
        identity: DynIdentity,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            catalog,
            objects,
            identity,
            settings,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Runs a pass over every manifest found under `root`, storing templates in `bucket`.
    pub async fn run(&self, root: &Path, bucket: &str) -> SyncResult<SyncReport> {
        let sources = discover_manifests(root, &self.settings)?;
        let owner = self.identity.caller_account().await?;
        tracing::info!(
            backend = self.catalog.backend_name(),
            owner = %owner,
            bucket,
            manifests = sources.len(),
            "starting catalog sync"
        );

        let mut report = SyncReport::default();
        for source in &sources {
            let manifest_report = self.sync_manifest(source, &owner, bucket).await?;
            report.manifests.push(manifest_report);
        }

        tracing::info!(
            manifests = report.manifests.len(),
            created = report.products_created(),
            updated = report.products_updated(),
            uploads = report.uploads(),
            "catalog sync complete"
        );
        Ok(report)
    }

    /// Reconciles a single manifest.
    pub async fn sync_manifest(
        &self,
        source: &ManifestSource,
        owner: &AccountId,
        bucket: &str,
    ) -> SyncResult<ManifestReport> {
        let manifest = &source.manifest;
        let catalog = self.catalog.as_ref();
        let objects = self.objects.as_ref();

        let portfolio = ensure_portfolio(catalog, manifest).await?;
        let portfolio_id = portfolio.portfolio.id.clone();
        let mut report = ManifestReport {
            portfolio: manifest.name.clone(),
            portfolio_id: portfolio_id.clone(),
            portfolio_created: portfolio.created,
            ..ManifestReport::default()
        };

        let principals = manifest.principal_arns(owner);
        report.principals_associated = reconcile_principals(catalog, &portfolio_id, &principals)
            .await?
            .associated;

        let existing = if portfolio.created {
            Vec::new()
        } else {
            list_products_for_portfolio(catalog, &portfolio_id).await?
        };
        let ctx = ProductContext {
            portfolio_id: &portfolio_id,
            vendor: &source.vendor,
            mapping_base: &source.mapping_base,
            vendor_dir: &source.vendor_dir,
            bucket,
            settings: &self.settings,
        };
        for decl in &manifest.products {
            let outcome = reconcile_product(catalog, objects, ctx, &existing, decl).await?;
            if outcome.uploaded {
                report.uploads.push(outcome.key.to_string());
            }
            match outcome.action {
                ProductAction::Create => report.products_created.push(outcome.name),
                ProductAction::UpdateArtifact => report.products_updated.push(outcome.name),
                ProductAction::Skip => report.products_skipped.push(outcome.name),
            }
        }

        let policy = apply_bucket_policy(
            objects,
            bucket,
            owner,
            &manifest.account_numbers(),
            &self.settings.templates_prefix,
        )
        .await?;
        report.policy_statement_appended = policy.written();

        let shares = reconcile_shares(catalog, &policy.accounts, &portfolio_id).await?;
        report.shares_added = shares.added;
        report.shares_removed = shares.removed;

        tracing::info!(
            portfolio = %report.portfolio,
            created = report.products_created.len(),
            updated = report.products_updated.len(),
            skipped = report.products_skipped.len(),
            shares_added = report.shares_added.len(),
            shares_removed = report.shares_removed.len(),
            "manifest reconciled"
        );
        Ok(report)
    }
}
