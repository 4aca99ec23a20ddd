//! Portfolio share reconciliation.

use scsync_catalog::CatalogService;
use scsync_core::AccountId;

use crate::error::SyncResult;
use crate::lookup::list_portfolio_shares;

/// Share calls issued by [`reconcile_shares`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl ShareChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Converges the portfolio's shares on `desired`.
///
/// Shares `desired \ current` and unshares `current \ desired`. Accounts that
/// were never shared are never unshared, so an empty current set only adds.
pub async fn reconcile_shares(
    catalog: &dyn CatalogService,
    desired: &[AccountId],
    portfolio_id: &str,
) -> SyncResult<ShareChanges> {
    let current = list_portfolio_shares(catalog, portfolio_id).await?;
    let mut changes = ShareChanges::default();

    for account in desired {
        if current.iter().any(|c| c == account.as_str()) {
            continue;
        }
        catalog
            .create_portfolio_share(portfolio_id, account.as_str())
            .await?;
        tracing::info!(portfolio = %portfolio_id, account = %account, "portfolio shared");
        changes.added.push(account.to_string());
    }

    for account in &current {
        if desired.iter().any(|d| d.as_str() == account) {
            continue;
        }
        catalog.delete_portfolio_share(portfolio_id, account).await?;
        tracing::info!(portfolio = %portfolio_id, account = %account, "portfolio share removed");
        changes.removed.push(account.clone());
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scsync_memory::{CatalogCall, InMemoryCatalog};

    fn accounts(ids: &[&str]) -> Vec<AccountId> {
        ids.iter().map(|id| AccountId::parse(id).unwrap()).collect()
    }

    #[tokio::test]
    async fn adds_missing_and_removes_undesired() {
        let catalog = InMemoryCatalog::new();
        let id = catalog.seed_portfolio("Networking").await;
        catalog.seed_share(&id, "222222222222").await;

        let changes = reconcile_shares(&catalog, &accounts(&["111111111111"]), &id)
            .await
            .unwrap();

        assert_eq!(changes.added, vec!["111111111111"]);
        assert_eq!(changes.removed, vec!["222222222222"]);
        assert_eq!(catalog.shares(&id).await, vec!["111111111111"]);
        assert_eq!(
            catalog.journal().await,
            vec![
                CatalogCall::CreateShare {
                    portfolio_id: id.clone(),
                    account_id: "111111111111".into()
                },
                CatalogCall::DeleteShare {
                    portfolio_id: id.clone(),
                    account_id: "222222222222".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn second_run_issues_no_calls() {
        let catalog = InMemoryCatalog::with_page_size(1);
        let id = catalog.seed_portfolio("Networking").await;
        catalog.seed_share(&id, "333333333333").await;
        let desired = accounts(&["111111111111", "222222222222"]);

        reconcile_shares(&catalog, &desired, &id).await.unwrap();
        catalog.clear_journal().await;

        let changes = reconcile_shares(&catalog, &desired, &id).await.unwrap();
        assert!(changes.is_empty());
        assert!(catalog.journal().await.is_empty());
    }

    #[tokio::test]
    async fn empty_current_set_issues_no_deletes() {
        let catalog = InMemoryCatalog::new();
        let id = catalog.seed_portfolio("Networking").await;

        let changes = reconcile_shares(&catalog, &accounts(&["111111111111"]), &id)
            .await
            .unwrap();

        assert!(changes.removed.is_empty());
        assert!(
            catalog
                .journal()
                .await
                .iter()
                .all(|c| !matches!(c, CatalogCall::DeleteShare { .. }))
        );
    }

    #[tokio::test]
    async fn final_shares_equal_desired() {
        let cases: [(&[&str], &[&str]); 4] = [
            (&[], &[]),
            (&["111111111111"], &[]),
            (&[], &["222222222222", "333333333333"]),
            (&["111111111111", "222222222222"], &["222222222222", "444444444444"]),
        ];
        for (desired, current) in cases {
            let catalog = InMemoryCatalog::with_page_size(1);
            let id = catalog.seed_portfolio("p").await;
            for account in current {
                catalog.seed_share(&id, account).await;
            }

            reconcile_shares(&catalog, &accounts(desired), &id).await.unwrap();

            let mut shares = catalog.shares(&id).await;
            shares.sort();
            let mut expected: Vec<String> = desired.iter().map(|s| s.to_string()).collect();
            expected.sort();
            assert_eq!(shares, expected);
        }
    }
}
