use async_trait::async_trait;
use aws_sdk_sts::Client;
use scsync_catalog::{CatalogError, CatalogResult, IdentityService};
use scsync_core::AccountId;

use crate::error::{missing_field, remote_error};

/// Caller identity from STS.
#[derive(Debug, Clone)]
pub struct StsIdentity {
    client: Client,
}

impl StsIdentity {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityService for StsIdentity {
    async fn caller_account(&self) -> CatalogResult<AccountId> {
        const OP: &str = "GetCallerIdentity";
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| remote_error(OP, e))?;
        let account = output.account().ok_or_else(|| missing_field(OP, "Account"))?;
        AccountId::parse(account).ok_or_else(|| {
            CatalogError::invalid_response(OP, format!("'{account}' is not an account id"))
        })
    }
}
