//! Principal association reconciliation.

use scsync_catalog::CatalogService;

use crate::error::SyncResult;
use crate::lookup::list_principals_for_portfolio;

/// Calls issued by [`reconcile_principals`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalChanges {
    pub removed: Vec<String>,
    pub associated: Vec<String>,
}

/// Replaces every principal association of the portfolio with `desired`.
///
/// Unlike shares, principals are not diffed: all current associations are
/// removed first, then each desired ARN is associated in order.
pub async fn reconcile_principals(
    catalog: &dyn CatalogService,
    portfolio_id: &str,
    desired: &[String],
) -> SyncResult<PrincipalChanges> {
    let current = list_principals_for_portfolio(catalog, portfolio_id).await?;
    let mut changes = PrincipalChanges::default();

    for arn in current {
        catalog.disassociate_principal(portfolio_id, &arn).await?;
        changes.removed.push(arn);
    }

    for arn in desired {
        catalog.associate_principal(portfolio_id, arn).await?;
        tracing::debug!(portfolio = %portfolio_id, principal = %arn, "principal associated");
        changes.associated.push(arn.clone());
    }

    tracing::info!(
        portfolio = %portfolio_id,
        removed = changes.removed.len(),
        associated = changes.associated.len(),
        "principals reconciled"
    );

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scsync_memory::{CatalogCall, InMemoryCatalog};

    #[tokio::test]
    async fn replaces_all_principals() {
        let catalog = InMemoryCatalog::new();
        let id = catalog.seed_portfolio("Networking").await;
        catalog
            .seed_principal(&id, "arn:aws:iam::999999999999:role/Old")
            .await;
        catalog
            .seed_principal(&id, "arn:aws:iam::999999999999:role/Keep")
            .await;

        let desired = vec![
            "arn:aws:iam::999999999999:role/Keep".to_string(),
            "arn:aws:iam::999999999999:role/New".to_string(),
        ];
        let changes = reconcile_principals(&catalog, &id, &desired).await.unwrap();

        assert_eq!(catalog.principals(&id).await, desired);
        // The kept principal is still removed and re-associated.
        assert_eq!(changes.removed.len(), 2);
        let journal = catalog.journal().await;
        assert!(matches!(journal[0], CatalogCall::DisassociatePrincipal { .. }));
        assert!(matches!(journal[1], CatalogCall::DisassociatePrincipal { .. }));
        assert!(matches!(journal[2], CatalogCall::AssociatePrincipal { .. }));
        assert_eq!(journal.len(), 4);
    }

    #[tokio::test]
    async fn empty_desired_clears_associations() {
        let catalog = InMemoryCatalog::with_page_size(1);
        let id = catalog.seed_portfolio("Networking").await;
        catalog.seed_principal(&id, "arn:aws:iam::999999999999:user/ci").await;
        catalog.seed_principal(&id, "arn:aws:iam::999999999999:user/ops").await;

        reconcile_principals(&catalog, &id, &[]).await.unwrap();
        assert!(catalog.principals(&id).await.is_empty());
    }
}
