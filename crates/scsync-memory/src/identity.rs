use async_trait::async_trait;
use scsync_catalog::{CatalogResult, IdentityService, JobReporter};
use scsync_core::AccountId;
use tokio::sync::RwLock;

/// Identity service that always answers with the same account.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    account: AccountId,
}

impl StaticIdentity {
    pub fn new(account: AccountId) -> Self {
        Self { account }
    }
}

#[async_trait]
impl IdentityService for StaticIdentity {
    async fn caller_account(&self) -> CatalogResult<AccountId> {
        Ok(self.account.clone())
    }
}

/// A reported job result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job_id: String,
    pub success: bool,
    pub message: String,
}

/// Job reporter that keeps every reported outcome.
#[derive(Debug, Default)]
pub struct RecordingJobReporter {
    outcomes: RwLock<Vec<JobOutcome>>,
}

impl RecordingJobReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outcomes(&self) -> Vec<JobOutcome> {
        self.outcomes.read().await.clone()
    }

    async fn push(&self, job_id: &str, success: bool, message: &str) {
        self.outcomes.write().await.push(JobOutcome {
            job_id: job_id.to_string(),
            success,
            message: message.to_string(),
        });
    }
}

#[async_trait]
impl JobReporter for RecordingJobReporter {
    async fn put_job_success(&self, job_id: &str, message: &str) -> CatalogResult<()> {
        self.push(job_id, true, message).await;
        Ok(())
    }

    async fn put_job_failure(&self, job_id: &str, message: &str) -> CatalogResult<()> {
        self.push(job_id, false, message).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reporter_keeps_order() {
        let reporter = RecordingJobReporter::new();
        reporter.put_job_success("j1", "Success").await.unwrap();
        reporter.put_job_failure("j2", "boom").await.unwrap();

        let outcomes = reporter.outcomes().await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].success);
        assert_eq!(outcomes[1].job_id, "j2");
        assert!(!outcomes[1].success);
    }

    #[tokio::test]
    async fn identity_returns_owner() {
        let owner = AccountId::parse("999999999999").unwrap();
        let identity = StaticIdentity::new(owner.clone());
        assert_eq!(identity.caller_account().await.unwrap(), owner);
    }
}
