//! Bucket policy reconciliation.

use scsync_catalog::ObjectStore;
use scsync_core::{AccountId, PolicyDocument, append_accounts, default_policy};

use crate::error::SyncResult;

/// Result of [`apply_bucket_policy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// Normalized accounts the manifest grants access to.
    pub accounts: Vec<AccountId>,
    /// Root ARNs added by the appended statement.
    pub appended: Vec<String>,
}

impl PolicyOutcome {
    pub fn written(&self) -> bool {
        !self.appended.is_empty()
    }
}

/// Grants every desired account read access to the stored templates.
///
/// A bucket without a policy starts from [`default_policy`]. The policy is
/// written back only when a statement was appended.
pub async fn apply_bucket_policy(
    objects: &dyn ObjectStore,
    bucket: &str,
    owner: &AccountId,
    desired: &[String],
    templates_prefix: &str,
) -> SyncResult<PolicyOutcome> {
    let mut document = match objects.get_bucket_policy(bucket).await? {
        Some(json) => PolicyDocument::from_json(&json)?,
        None => {
            tracing::debug!(bucket, "bucket has no policy, starting from default");
            default_policy(bucket, owner)
        }
    };

    let statements = std::mem::take(&mut document.statements);
    let update = append_accounts(statements, desired, owner, bucket, templates_prefix);
    document.statements = update.statements;

    if !update.appended.is_empty() {
        objects
            .put_bucket_policy(bucket, &document.to_json()?)
            .await?;
        tracing::info!(
            bucket,
            accounts = update.appended.len(),
            "bucket policy statement appended"
        );
    }

    Ok(PolicyOutcome {
        accounts: update.accounts,
        appended: update.appended,
    })
}
