//! Portfolio lookup, creation and metadata update.

use scsync_catalog::{CatalogService, PortfolioSpec, PortfolioSummary, PortfolioUpdate, Tag};
use scsync_core::Manifest;

use crate::error::SyncResult;
use crate::lookup::find_portfolio;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioOutcome {
    pub portfolio: PortfolioSummary,
    /// `true` when the portfolio did not exist before this pass.
    pub created: bool,
}

fn declared_tags(manifest: &Manifest) -> Vec<Tag> {
    manifest
        .tag_pairs()
        .into_iter()
        .map(|(k, v)| Tag::new(k, v))
        .collect()
}

/// Finds the manifest's portfolio by display name, creating it when absent
/// and otherwise updating its description, provider and tags.
///
/// Tags are replaced only when the manifest declares them: every existing key
/// is removed and the declared tags are added.
pub async fn ensure_portfolio(
    catalog: &dyn CatalogService,
    manifest: &Manifest,
) -> SyncResult<PortfolioOutcome> {
    let Some(existing) = find_portfolio(catalog, &manifest.name).await? else {
        let spec = PortfolioSpec {
            display_name: manifest.name.clone(),
            description: manifest.description.clone(),
            provider_name: manifest.owner.clone(),
            tags: declared_tags(manifest),
            idempotency_token: uuid::Uuid::new_v4().to_string(),
        };
        let portfolio = catalog.create_portfolio(&spec).await?;
        tracing::info!(portfolio = %manifest.name, id = %portfolio.id, "portfolio created");
        return Ok(PortfolioOutcome {
            portfolio,
            created: true,
        });
    };

    let (add_tags, remove_tag_keys) = if manifest.tags.is_some() {
        let current = catalog.portfolio_tags(&existing.id).await?;
        (
            declared_tags(manifest),
            current.into_iter().map(|t| t.key).collect(),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    catalog
        .update_portfolio(&PortfolioUpdate {
            id: existing.id.clone(),
            description: manifest.description.clone(),
            provider_name: manifest.owner.clone(),
            add_tags,
            remove_tag_keys,
        })
        .await?;
    tracing::info!(portfolio = %manifest.name, id = %existing.id, "portfolio updated");

    Ok(PortfolioOutcome {
        portfolio: existing,
        created: false,
    })
}
