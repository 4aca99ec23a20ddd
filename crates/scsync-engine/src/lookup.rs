//! Paginated lookups against the catalog service.
//!
//! Every call re-fetches from the remote side; nothing is cached between calls.

use scsync_catalog::{CatalogResult, CatalogService, PortfolioSummary, ProductSummary, collect_pages};

use crate::error::{SyncError, SyncResult};

pub async fn list_all_portfolios(
    catalog: &dyn CatalogService,
) -> CatalogResult<Vec<PortfolioSummary>> {
    collect_pages(move |token| catalog.list_portfolios_page(token)).await
}

pub async fn list_products_for_portfolio(
    catalog: &dyn CatalogService,
    portfolio_id: &str,
) -> CatalogResult<Vec<ProductSummary>> {
    collect_pages(move |token| catalog.list_products_page(portfolio_id, token)).await
}

pub async fn list_portfolio_shares(
    catalog: &dyn CatalogService,
    portfolio_id: &str,
) -> CatalogResult<Vec<String>> {
    collect_pages(move |token| catalog.list_shares_page(portfolio_id, token)).await
}

pub async fn list_principals_for_portfolio(
    catalog: &dyn CatalogService,
    portfolio_id: &str,
) -> CatalogResult<Vec<String>> {
    collect_pages(move |token| catalog.list_principals_page(portfolio_id, token)).await
}

/// Finds the portfolio whose display name equals `name`.
///
/// # Errors
///
/// `SyncError::AmbiguousPortfolio` when several portfolios carry the name.
pub async fn find_portfolio(
    catalog: &dyn CatalogService,
    name: &str,
) -> SyncResult<Option<PortfolioSummary>> {
    let mut matches: Vec<PortfolioSummary> = list_all_portfolios(catalog)
        .await?
        .into_iter()
        .filter(|p| p.display_name == name)
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        _ => Err(SyncError::AmbiguousPortfolio {
            name: name.to_string(),
            ids: matches.into_iter().map(|p| p.id).collect(),
        }),
    }
}

/// Finds a product by name within an already listed portfolio.
pub fn find_product<'a>(products: &'a [ProductSummary], name: &str) -> Option<&'a ProductSummary> {
    products.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scsync_memory::InMemoryCatalog;

    #[tokio::test]
    async fn lists_across_pages() {
        let catalog = InMemoryCatalog::with_page_size(2);
        let id = catalog.seed_portfolio("Networking").await;
        for account in ["111111111111", "222222222222", "333333333333"] {
            catalog.seed_share(&id, account).await;
        }

        let shares = list_portfolio_shares(&catalog, &id).await.unwrap();
        assert_eq!(shares, vec!["111111111111", "222222222222", "333333333333"]);
    }

    #[tokio::test]
    async fn empty_lists_are_empty() {
        let catalog = InMemoryCatalog::new();
        assert!(list_all_portfolios(&catalog).await.unwrap().is_empty());
        let id = catalog.seed_portfolio("Empty").await;
        assert!(list_products_for_portfolio(&catalog, &id).await.unwrap().is_empty());
        assert!(list_principals_for_portfolio(&catalog, &id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_portfolio_matches_display_name() {
        let catalog = InMemoryCatalog::with_page_size(1);
        catalog.seed_portfolio("Storage").await;
        let id = catalog.seed_portfolio("Networking").await;

        let found = find_portfolio(&catalog, "Networking").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(id));
        assert!(find_portfolio(&catalog, "Compute").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_display_names_are_ambiguous() {
        let catalog = InMemoryCatalog::new();
        catalog.seed_portfolio("Networking").await;
        catalog.seed_portfolio("Networking").await;

        let err = find_portfolio(&catalog, "Networking").await.unwrap_err();
        assert!(matches!(err, SyncError::AmbiguousPortfolio { ref ids, .. } if ids.len() == 2));
    }
}
