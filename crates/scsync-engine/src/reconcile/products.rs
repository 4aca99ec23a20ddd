//! Product and provisioning-artifact reconciliation.

use std::path::Path;

use scsync_catalog::{
    ArtifactSpec, CatalogService, ObjectLookup, ObjectStore, ProductSpec, ProductSummary,
};
use scsync_core::{ProductDecl, TemplateKey, digest};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::config::CatalogSettings;
use crate::error::SyncResult;
use crate::lookup::find_product;
use crate::reconcile::change::has_changed;

/// Name of the first provisioning artifact of a new product.
pub const INITIAL_ARTIFACT_NAME: &str = "InitialCreation";

/// Where the products of one manifest live, locally and remotely.
#[derive(Debug, Clone, Copy)]
pub struct ProductContext<'a> {
    pub portfolio_id: &'a str,
    pub vendor: &'a str,
    /// Manifest file name without `.yaml`.
    pub mapping_base: &'a str,
    pub vendor_dir: &'a Path,
    pub bucket: &'a str,
    pub settings: &'a CatalogSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    /// The product did not exist and was created with its first artifact.
    Create,
    /// The template changed and a new provisioning artifact was registered.
    UpdateArtifact,
    /// The stored template matches the local one.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOutcome {
    pub name: String,
    pub product_id: String,
    pub action: ProductAction,
    pub key: TemplateKey,
    /// Whether the template body was uploaded during this pass.
    pub uploaded: bool,
}

/// Brings one declared product in line with its template.
///
/// `existing` is the portfolio's current product list.
pub async fn reconcile_product(
    catalog: &dyn CatalogService,
    objects: &dyn ObjectStore,
    ctx: ProductContext<'_>,
    existing: &[ProductSummary],
    decl: &ProductDecl,
) -> SyncResult<ProductOutcome> {
    let template_path = ctx.vendor_dir.join(&decl.template);
    let local = digest(&template_path)?;
    let key = TemplateKey::new(
        &ctx.settings.templates_prefix,
        ctx.vendor,
        ctx.mapping_base,
        &decl.name,
        &local,
    );
    let template_url = key.url(&ctx.settings.template_url_base, ctx.bucket);

    match find_product(existing, &decl.name) {
        None => {
            let uploaded = match objects.head_object(ctx.bucket, key.as_str()).await? {
                ObjectLookup::Found(_) => false,
                ObjectLookup::NotFound => {
                    upload(objects, ctx.bucket, &key, &template_path).await?;
                    true
                }
            };

            let spec = ProductSpec {
                name: decl.name.clone(),
                owner: decl.owner.clone(),
                description: decl.description.clone(),
                support_email: decl.support_email().to_string(),
                artifact: ArtifactSpec {
                    name: INITIAL_ARTIFACT_NAME.to_string(),
                    description: INITIAL_ARTIFACT_NAME.to_string(),
                    template_url,
                },
                idempotency_token: uuid::Uuid::new_v4().to_string(),
            };
            let product = catalog.create_product(&spec).await?;
            catalog
                .associate_product(&product.product_id, ctx.portfolio_id)
                .await?;
            tracing::info!(
                product = %decl.name,
                id = %product.product_id,
                portfolio = %ctx.portfolio_id,
                "product created"
            );

            Ok(ProductOutcome {
                name: decl.name.clone(),
                product_id: product.product_id,
                action: ProductAction::Create,
                key,
                uploaded,
            })
        }
        Some(product) => {
            let check = has_changed(objects, ctx.bucket, key.as_str(), &template_path).await?;
            if !check.changed {
                tracing::info!(product = %decl.name, key = %key, "template unchanged, skipping");
                return Ok(ProductOutcome {
                    name: decl.name.clone(),
                    product_id: product.product_id.clone(),
                    action: ProductAction::Skip,
                    key,
                    uploaded: false,
                });
            }

            upload(objects, ctx.bucket, &key, &template_path).await?;
            let artifact = ArtifactSpec {
                name: uuid::Uuid::new_v4().to_string(),
                description: artifact_timestamp(),
                template_url,
            };
            let artifact_id = catalog
                .create_provisioning_artifact(&product.product_id, &artifact)
                .await?;
            tracing::info!(
                product = %decl.name,
                artifact = %artifact_id,
                "provisioning artifact created"
            );

            Ok(ProductOutcome {
                name: decl.name.clone(),
                product_id: product.product_id.clone(),
                action: ProductAction::UpdateArtifact,
                key,
                uploaded: true,
            })
        }
    }
}

async fn upload(
    objects: &dyn ObjectStore,
    bucket: &str,
    key: &TemplateKey,
    path: &Path,
) -> SyncResult<()> {
    objects
        .put_object_from_file(bucket, key.as_str(), path)
        .await?;
    tracing::info!(bucket, key = %key, "template uploaded");
    Ok(())
}

fn artifact_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string())
}
