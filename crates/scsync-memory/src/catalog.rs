use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use scsync_catalog::{
    ArtifactSpec, CatalogError, CatalogResult, CatalogService, Page, PortfolioSpec,
    PortfolioSummary, PortfolioUpdate, ProductSpec, ProductSummary, Tag,
};
use tokio::sync::RwLock;

use crate::DEFAULT_PAGE_SIZE;

/// A mutating call received by [`InMemoryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    CreatePortfolio { display_name: String },
    UpdatePortfolio { portfolio_id: String },
    CreateShare { portfolio_id: String, account_id: String },
    DeleteShare { portfolio_id: String, account_id: String },
    AssociatePrincipal { portfolio_id: String, principal_arn: String },
    DisassociatePrincipal { portfolio_id: String, principal_arn: String },
    CreateProduct { name: String, template_url: String },
    AssociateProduct { product_id: String, portfolio_id: String },
    CreateProvisioningArtifact { product_id: String, template_url: String },
}

#[derive(Debug)]
struct PortfolioRecord {
    summary: PortfolioSummary,
    tags: Vec<Tag>,
    shares: Vec<String>,
    principals: Vec<String>,
    product_ids: Vec<String>,
}

#[derive(Debug)]
struct ProductRecord {
    summary: ProductSummary,
    artifacts: Vec<ArtifactSpec>,
}

#[derive(Debug, Default)]
struct CatalogState {
    portfolios: Vec<PortfolioRecord>,
    products: Vec<ProductRecord>,
    journal: Vec<CatalogCall>,
}

impl CatalogState {
    fn portfolio(&self, id: &str) -> CatalogResult<&PortfolioRecord> {
        self.portfolios
            .iter()
            .find(|p| p.summary.id == id)
            .ok_or_else(|| CatalogError::not_found("portfolio", id))
    }

    fn portfolio_mut(&mut self, id: &str) -> CatalogResult<&mut PortfolioRecord> {
        self.portfolios
            .iter_mut()
            .find(|p| p.summary.id == id)
            .ok_or_else(|| CatalogError::not_found("portfolio", id))
    }

    fn product_mut(&mut self, id: &str) -> CatalogResult<&mut ProductRecord> {
        self.products
            .iter_mut()
            .find(|p| p.summary.product_id == id)
            .ok_or_else(|| CatalogError::not_found("product", id))
    }
}

/// In-memory catalog service.
///
/// Listings are served in insertion order, `page_size` items at a time, with
/// the offset of the next page as continuation token.
#[derive(Debug)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
    page_size: usize,
    id_counter: AtomicU64,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            page_size: page_size.max(1),
            id_counter: AtomicU64::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!(
            "{prefix}-{:012}",
            self.id_counter.fetch_add(1, Ordering::SeqCst)
        )
    }

    fn page<T: Clone>(&self, all: &[T], token: Option<String>) -> CatalogResult<Page<T>> {
        let offset = match token {
            Some(t) => t
                .parse::<usize>()
                .map_err(|_| CatalogError::invalid_response("pagination", format!("bad token {t}")))?,
            None => 0,
        };
        let end = (offset + self.page_size).min(all.len());
        let items = all.get(offset..end).map(<[T]>::to_vec).unwrap_or_default();
        if end < all.len() {
            Ok(Page::with_next(items, end.to_string()))
        } else {
            Ok(Page::last(items))
        }
    }

    // ==================== Seeding ====================

    /// Adds a portfolio without recording a call. Returns its id.
    pub async fn seed_portfolio(&self, display_name: &str) -> String {
        let id = self.next_id("port");
        let mut state = self.state.write().await;
        state.portfolios.push(PortfolioRecord {
            summary: PortfolioSummary {
                id: id.clone(),
                display_name: display_name.to_string(),
                description: None,
                provider_name: None,
            },
            tags: Vec::new(),
            shares: Vec::new(),
            principals: Vec::new(),
            product_ids: Vec::new(),
        });
        id
    }

    /// Adds a product under a portfolio without recording a call. Returns its id.
    ///
    /// Unknown portfolio ids are ignored apart from creating the product.
    pub async fn seed_product(&self, portfolio_id: &str, name: &str) -> String {
        let id = self.next_id("prod");
        let mut state = self.state.write().await;
        state.products.push(ProductRecord {
            summary: ProductSummary {
                product_id: id.clone(),
                name: name.to_string(),
                owner: None,
            },
            artifacts: Vec::new(),
        });
        if let Ok(portfolio) = state.portfolio_mut(portfolio_id) {
            portfolio.product_ids.push(id.clone());
        }
        id
    }

    pub async fn seed_share(&self, portfolio_id: &str, account_id: &str) {
        let mut state = self.state.write().await;
        if let Ok(portfolio) = state.portfolio_mut(portfolio_id) {
            portfolio.shares.push(account_id.to_string());
        }
    }

    pub async fn seed_principal(&self, portfolio_id: &str, principal_arn: &str) {
        let mut state = self.state.write().await;
        if let Ok(portfolio) = state.portfolio_mut(portfolio_id) {
            portfolio.principals.push(principal_arn.to_string());
        }
    }

    pub async fn seed_tags(&self, portfolio_id: &str, tags: Vec<Tag>) {
        let mut state = self.state.write().await;
        if let Ok(portfolio) = state.portfolio_mut(portfolio_id) {
            portfolio.tags = tags;
        }
    }

    // ==================== Inspection ====================

    /// Every mutating call received so far, in order.
    pub async fn journal(&self) -> Vec<CatalogCall> {
        self.state.read().await.journal.clone()
    }

    pub async fn clear_journal(&self) {
        self.state.write().await.journal.clear();
    }

    pub async fn portfolios(&self) -> Vec<PortfolioSummary> {
        let state = self.state.read().await;
        state.portfolios.iter().map(|p| p.summary.clone()).collect()
    }

    pub async fn shares(&self, portfolio_id: &str) -> Vec<String> {
        let state = self.state.read().await;
        state
            .portfolio(portfolio_id)
            .map(|p| p.shares.clone())
            .unwrap_or_default()
    }

    pub async fn principals(&self, portfolio_id: &str) -> Vec<String> {
        let state = self.state.read().await;
        state
            .portfolio(portfolio_id)
            .map(|p| p.principals.clone())
            .unwrap_or_default()
    }

    pub async fn tags(&self, portfolio_id: &str) -> Vec<Tag> {
        let state = self.state.read().await;
        state
            .portfolio(portfolio_id)
            .map(|p| p.tags.clone())
            .unwrap_or_default()
    }

    /// Provisioning artifacts registered for a product, oldest first.
    pub async fn artifacts(&self, product_id: &str) -> Vec<ArtifactSpec> {
        let state = self.state.read().await;
        state
            .products
            .iter()
            .find(|p| p.summary.product_id == product_id)
            .map(|p| p.artifacts.clone())
            .unwrap_or_default()
    }

    async fn record(&self, call: CatalogCall) {
        tracing::debug!(?call, "in-memory catalog call");
        self.state.write().await.journal.push(call);
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn list_portfolios_page(
        &self,
        page_token: Option<String>,
    ) -> CatalogResult<Page<PortfolioSummary>> {
        let state = self.state.read().await;
        let all: Vec<PortfolioSummary> =
            state.portfolios.iter().map(|p| p.summary.clone()).collect();
        self.page(&all, page_token)
    }

    async fn list_products_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<ProductSummary>> {
        let state = self.state.read().await;
        let portfolio = state.portfolio(portfolio_id)?;
        let all: Vec<ProductSummary> = portfolio
            .product_ids
            .iter()
            .filter_map(|id| state.products.iter().find(|p| &p.summary.product_id == id))
            .map(|p| p.summary.clone())
            .collect();
        self.page(&all, page_token)
    }

    async fn list_shares_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<String>> {
        let state = self.state.read().await;
        let portfolio = state.portfolio(portfolio_id)?;
        self.page(&portfolio.shares, page_token)
    }

    async fn list_principals_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<String>> {
        let state = self.state.read().await;
        let portfolio = state.portfolio(portfolio_id)?;
        self.page(&portfolio.principals, page_token)
    }

    async fn portfolio_tags(&self, portfolio_id: &str) -> CatalogResult<Vec<Tag>> {
        let state = self.state.read().await;
        Ok(state.portfolio(portfolio_id)?.tags.clone())
    }

    async fn create_portfolio(&self, spec: &PortfolioSpec) -> CatalogResult<PortfolioSummary> {
        let summary = PortfolioSummary {
            id: self.next_id("port"),
            display_name: spec.display_name.clone(),
            description: Some(spec.description.clone()),
            provider_name: Some(spec.provider_name.clone()),
        };
        {
            let mut state = self.state.write().await;
            state.portfolios.push(PortfolioRecord {
                summary: summary.clone(),
                tags: spec.tags.clone(),
                shares: Vec::new(),
                principals: Vec::new(),
                product_ids: Vec::new(),
            });
        }
        self.record(CatalogCall::CreatePortfolio {
            display_name: spec.display_name.clone(),
        })
        .await;
        Ok(summary)
    }

    async fn update_portfolio(&self, update: &PortfolioUpdate) -> CatalogResult<()> {
        {
            let mut state = self.state.write().await;
            let portfolio = state.portfolio_mut(&update.id)?;
            portfolio.summary.description = Some(update.description.clone());
            portfolio.summary.provider_name = Some(update.provider_name.clone());
            portfolio
                .tags
                .retain(|t| !update.remove_tag_keys.contains(&t.key));
            for tag in &update.add_tags {
                portfolio.tags.retain(|t| t.key != tag.key);
                portfolio.tags.push(tag.clone());
            }
        }
        self.record(CatalogCall::UpdatePortfolio {
            portfolio_id: update.id.clone(),
        })
        .await;
        Ok(())
    }

    async fn create_portfolio_share(
        &self,
        portfolio_id: &str,
        account_id: &str,
    ) -> CatalogResult<()> {
        {
            let mut state = self.state.write().await;
            let portfolio = state.portfolio_mut(portfolio_id)?;
            if !portfolio.shares.iter().any(|a| a == account_id) {
                portfolio.shares.push(account_id.to_string());
            }
        }
        self.record(CatalogCall::CreateShare {
            portfolio_id: portfolio_id.to_string(),
            account_id: account_id.to_string(),
        })
        .await;
        Ok(())
    }

    async fn delete_portfolio_share(
        &self,
        portfolio_id: &str,
        account_id: &str,
    ) -> CatalogResult<()> {
        {
            let mut state = self.state.write().await;
            let portfolio = state.portfolio_mut(portfolio_id)?;
            let before = portfolio.shares.len();
            portfolio.shares.retain(|a| a != account_id);
            if portfolio.shares.len() == before {
                return Err(CatalogError::not_found(
                    "portfolio share",
                    format!("{portfolio_id}/{account_id}"),
                ));
            }
        }
        self.record(CatalogCall::DeleteShare {
            portfolio_id: portfolio_id.to_string(),
            account_id: account_id.to_string(),
        })
        .await;
        Ok(())
    }

    async fn associate_principal(
        &self,
        portfolio_id: &str,
        principal_arn: &str,
    ) -> CatalogResult<()> {
        {
            let mut state = self.state.write().await;
            let portfolio = state.portfolio_mut(portfolio_id)?;
            if !portfolio.principals.iter().any(|p| p == principal_arn) {
                portfolio.principals.push(principal_arn.to_string());
            }
        }
        self.record(CatalogCall::AssociatePrincipal {
            portfolio_id: portfolio_id.to_string(),
            principal_arn: principal_arn.to_string(),
        })
        .await;
        Ok(())
    }

    async fn disassociate_principal(
        &self,
        portfolio_id: &str,
        principal_arn: &str,
    ) -> CatalogResult<()> {
        {
            let mut state = self.state.write().await;
            let portfolio = state.portfolio_mut(portfolio_id)?;
            let before = portfolio.principals.len();
            portfolio.principals.retain(|p| p != principal_arn);
            if portfolio.principals.len() == before {
                return Err(CatalogError::not_found(
                    "principal association",
                    format!("{portfolio_id}/{principal_arn}"),
                ));
            }
        }
        self.record(CatalogCall::DisassociatePrincipal {
            portfolio_id: portfolio_id.to_string(),
            principal_arn: principal_arn.to_string(),
        })
        .await;
        Ok(())
    }

    async fn create_product(&self, spec: &ProductSpec) -> CatalogResult<ProductSummary> {
        let summary = ProductSummary {
            product_id: self.next_id("prod"),
            name: spec.name.clone(),
            owner: Some(spec.owner.clone()),
        };
        {
            let mut state = self.state.write().await;
            state.products.push(ProductRecord {
                summary: summary.clone(),
                artifacts: vec![spec.artifact.clone()],
            });
        }
        self.record(CatalogCall::CreateProduct {
            name: spec.name.clone(),
            template_url: spec.artifact.template_url.clone(),
        })
        .await;
        Ok(summary)
    }

    async fn associate_product(&self, product_id: &str, portfolio_id: &str) -> CatalogResult<()> {
        {
            let mut state = self.state.write().await;
            if !state.products.iter().any(|p| p.summary.product_id == product_id) {
                return Err(CatalogError::not_found("product", product_id));
            }
            let portfolio = state.portfolio_mut(portfolio_id)?;
            if !portfolio.product_ids.iter().any(|p| p == product_id) {
                portfolio.product_ids.push(product_id.to_string());
            }
        }
        self.record(CatalogCall::AssociateProduct {
            product_id: product_id.to_string(),
            portfolio_id: portfolio_id.to_string(),
        })
        .await;
        Ok(())
    }

    async fn create_provisioning_artifact(
        &self,
        product_id: &str,
        artifact: &ArtifactSpec,
    ) -> CatalogResult<String> {
        let artifact_id = self.next_id("pa");
        {
            let mut state = self.state.write().await;
            state.product_mut(product_id)?.artifacts.push(artifact.clone());
        }
        self.record(CatalogCall::CreateProvisioningArtifact {
            product_id: product_id.to_string(),
            template_url: artifact.template_url.clone(),
        })
        .await;
        Ok(artifact_id)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
