use async_trait::async_trait;
use aws_sdk_servicecatalog::Client;
use aws_sdk_servicecatalog::types::{
    PortfolioDetail, PrincipalType, ProductType, ProductViewSummary,
    ProvisioningArtifactProperties, ProvisioningArtifactType, Tag as SdkTag,
};
use scsync_catalog::{
    ArtifactSpec, CatalogError, CatalogResult, CatalogService, Page, PortfolioSpec,
    PortfolioSummary, PortfolioUpdate, ProductSpec, ProductSummary, Tag,
};

use crate::error::{missing_field, remote_error};

/// Key of the provisioning-artifact info entry holding the template URL.
const TEMPLATE_URL_INFO_KEY: &str = "LoadTemplateFromURL";

/// Service Catalog admin API.
#[derive(Debug, Clone)]
pub struct ServiceCatalogClient {
    client: Client,
}

impl ServiceCatalogClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn portfolio_summary(detail: &PortfolioDetail) -> Option<PortfolioSummary> {
    Some(PortfolioSummary {
        id: detail.id()?.to_string(),
        display_name: detail.display_name()?.to_string(),
        description: detail.description().map(str::to_string),
        provider_name: detail.provider_name().map(str::to_string),
    })
}

fn product_summary(summary: &ProductViewSummary) -> Option<ProductSummary> {
    Some(ProductSummary {
        product_id: summary.product_id()?.to_string(),
        name: summary.name()?.to_string(),
        owner: summary.owner().map(str::to_string),
    })
}

fn sdk_tags(operation: &'static str, tags: &[Tag]) -> CatalogResult<Vec<SdkTag>> {
    tags.iter()
        .map(|t| {
            SdkTag::builder()
                .key(&t.key)
                .value(&t.value)
                .build()
                .map_err(|e| CatalogError::invalid_response(operation, e.to_string()))
        })
        .collect()
}

fn artifact_properties(
    operation: &'static str,
    artifact: &ArtifactSpec,
) -> CatalogResult<ProvisioningArtifactProperties> {
    // `build()` is infallible for this type in the current SDK.
    let _ = operation;
    Ok(ProvisioningArtifactProperties::builder()
        .name(&artifact.name)
        .description(&artifact.description)
        .info(TEMPLATE_URL_INFO_KEY, &artifact.template_url)
        .r#type(ProvisioningArtifactType::CloudFormationTemplate)
        .build())
}

#[async_trait]
impl CatalogService for ServiceCatalogClient {
    async fn list_portfolios_page(
        &self,
        page_token: Option<String>,
    ) -> CatalogResult<Page<PortfolioSummary>> {
        let output = self
            .client
            .list_portfolios()
            .set_page_token(page_token)
            .send()
            .await
            .map_err(|e| remote_error("ListPortfolios", e))?;

        Ok(Page {
            items: output
                .portfolio_details()
                .iter()
                .filter_map(portfolio_summary)
                .collect(),
            next_token: output.next_page_token().map(str::to_string),
        })
    }

    async fn list_products_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<ProductSummary>> {
        let output = self
            .client
            .search_products_as_admin()
            .portfolio_id(portfolio_id)
            .set_page_token(page_token)
            .send()
            .await
            .map_err(|e| remote_error("SearchProductsAsAdmin", e))?;

        Ok(Page {
            items: output
                .product_view_details()
                .iter()
                .filter_map(|d| d.product_view_summary())
                .filter_map(product_summary)
                .collect(),
            next_token: output.next_page_token().map(str::to_string),
        })
    }

    async fn list_shares_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<String>> {
        let output = self
            .client
            .list_portfolio_access()
            .portfolio_id(portfolio_id)
            .set_page_token(page_token)
            .send()
            .await
            .map_err(|e| remote_error("ListPortfolioAccess", e))?;

        Ok(Page {
            items: output.account_ids().to_vec(),
            next_token: output.next_page_token().map(str::to_string),
        })
    }

    async fn list_principals_page(
        &self,
        portfolio_id: &str,
        page_token: Option<String>,
    ) -> CatalogResult<Page<String>> {
        let output = self
            .client
            .list_principals_for_portfolio()
            .portfolio_id(portfolio_id)
            .set_page_token(page_token)
            .send()
            .await
            .map_err(|e| remote_error("ListPrincipalsForPortfolio", e))?;

        Ok(Page {
            items: output
                .principals()
                .iter()
                .filter_map(|p| p.principal_arn().map(str::to_string))
                .collect(),
            next_token: output.next_page_token().map(str::to_string),
        })
    }

    async fn portfolio_tags(&self, portfolio_id: &str) -> CatalogResult<Vec<Tag>> {
        let output = self
            .client
            .describe_portfolio()
            .id(portfolio_id)
            .send()
            .await
            .map_err(|e| remote_error("DescribePortfolio", e))?;

        Ok(output
            .tags()
            .iter()
            .map(|t| Tag::new(t.key(), t.value()))
            .collect())
    }

    async fn create_portfolio(&self, spec: &PortfolioSpec) -> CatalogResult<PortfolioSummary> {
        const OP: &str = "CreatePortfolio";
        let tags = sdk_tags(OP, &spec.tags)?;
        let output = self
            .client
            .create_portfolio()
            .display_name(&spec.display_name)
            .description(&spec.description)
            .provider_name(&spec.provider_name)
            .set_tags((!tags.is_empty()).then_some(tags))
            .idempotency_token(&spec.idempotency_token)
            .send()
            .await
            .map_err(|e| remote_error(OP, e))?;

        output
            .portfolio_detail()
            .and_then(portfolio_summary)
            .ok_or_else(|| missing_field(OP, "PortfolioDetail"))
    }

    async fn update_portfolio(&self, update: &PortfolioUpdate) -> CatalogResult<()> {
        const OP: &str = "UpdatePortfolio";
        let add_tags = sdk_tags(OP, &update.add_tags)?;
        self.client
            .update_portfolio()
            .id(&update.id)
            .description(&update.description)
            .provider_name(&update.provider_name)
            .set_add_tags((!add_tags.is_empty()).then_some(add_tags))
            .set_remove_tags(
                (!update.remove_tag_keys.is_empty()).then(|| update.remove_tag_keys.clone()),
            )
            .send()
            .await
            .map_err(|e| remote_error(OP, e))?;
        Ok(())
    }

    async fn create_portfolio_share(
        &self,
        portfolio_id: &str,
        account_id: &str,
    ) -> CatalogResult<()> {
        self.client
            .create_portfolio_share()
            .portfolio_id(portfolio_id)
            .account_id(account_id)
            .send()
            .await
            .map_err(|e| remote_error("CreatePortfolioShare", e))?;
        Ok(())
    }

    async fn delete_portfolio_share(
        &self,
        portfolio_id: &str,
        account_id: &str,
    ) -> CatalogResult<()> {
        self.client
            .delete_portfolio_share()
            .portfolio_id(portfolio_id)
            .account_id(account_id)
            .send()
            .await
            .map_err(|e| remote_error("DeletePortfolioShare", e))?;
        Ok(())
    }

    async fn associate_principal(
        &self,
        portfolio_id: &str,
        principal_arn: &str,
    ) -> CatalogResult<()> {
        self.client
            .associate_principal_with_portfolio()
            .portfolio_id(portfolio_id)
            .principal_arn(principal_arn)
            .principal_type(PrincipalType::Iam)
            .send()
            .await
            .map_err(|e| remote_error("AssociatePrincipalWithPortfolio", e))?;
        Ok(())
    }

    async fn disassociate_principal(
        &self,
        portfolio_id: &str,
        principal_arn: &str,
    ) -> CatalogResult<()> {
        self.client
            .disassociate_principal_from_portfolio()
            .portfolio_id(portfolio_id)
            .principal_arn(principal_arn)
            .send()
            .await
            .map_err(|e| remote_error("DisassociatePrincipalFromPortfolio", e))?;
        Ok(())
    }

    async fn create_product(&self, spec: &ProductSpec) -> CatalogResult<ProductSummary> {
        const OP: &str = "CreateProduct";
        let output = self
            .client
            .create_product()
            .name(&spec.name)
            .owner(&spec.owner)
            .description(&spec.description)
            .support_email(&spec.support_email)
            .product_type(ProductType::CloudFormationTemplate)
            .provisioning_artifact_parameters(artifact_properties(OP, &spec.artifact)?)
            .idempotency_token(&spec.idempotency_token)
            .send()
            .await
            .map_err(|e| remote_error(OP, e))?;

        output
            .product_view_detail()
            .and_then(|d| d.product_view_summary())
            .and_then(product_summary)
            .ok_or_else(|| missing_field(OP, "ProductViewDetail.ProductViewSummary"))
    }

    async fn associate_product(&self, product_id: &str, portfolio_id: &str) -> CatalogResult<()> {
        self.client
            .associate_product_with_portfolio()
            .product_id(product_id)
            .portfolio_id(portfolio_id)
            .send()
            .await
            .map_err(|e| remote_error("AssociateProductWithPortfolio", e))?;
        Ok(())
    }

    async fn create_provisioning_artifact(
        &self,
        product_id: &str,
        artifact: &ArtifactSpec,
    ) -> CatalogResult<String> {
        const OP: &str = "CreateProvisioningArtifact";
        let output = self
            .client
            .create_provisioning_artifact()
            .product_id(product_id)
            .parameters(artifact_properties(OP, artifact)?)
            .idempotency_token(uuid::Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| remote_error(OP, e))?;

        output
            .provisioning_artifact_detail()
            .and_then(|d| d.id())
            .map(str::to_string)
            .ok_or_else(|| missing_field(OP, "ProvisioningArtifactDetail.Id"))
    }

    fn backend_name(&self) -> &'static str {
        "servicecatalog"
    }
}
