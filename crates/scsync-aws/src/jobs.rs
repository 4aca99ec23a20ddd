use async_trait::async_trait;
use aws_sdk_codepipeline::Client;
use aws_sdk_codepipeline::types::{FailureDetails, FailureType};
use scsync_catalog::{CatalogError, CatalogResult, JobReporter};

use crate::error::remote_error;

/// Reports job results to CodePipeline.
#[derive(Debug, Clone)]
pub struct CodePipelineReporter {
    client: Client,
}

impl CodePipelineReporter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobReporter for CodePipelineReporter {
    async fn put_job_success(&self, job_id: &str, message: &str) -> CatalogResult<()> {
        tracing::info!(job = %job_id, message, "putting job success");
        self.client
            .put_job_success_result()
            .job_id(job_id)
            .send()
            .await
            .map_err(|e| remote_error("PutJobSuccessResult", e))?;
        Ok(())
    }

    async fn put_job_failure(&self, job_id: &str, message: &str) -> CatalogResult<()> {
        const OP: &str = "PutJobFailureResult";
        tracing::info!(job = %job_id, message, "putting job failure");
        let details = FailureDetails::builder()
            .r#type(FailureType::JobFailed)
            .message(message)
            .build()
            .map_err(|e| CatalogError::invalid_response(OP, e.to_string()))?;
        self.client
            .put_job_failure_result()
            .job_id(job_id)
            .failure_details(details)
            .send()
            .await
            .map_err(|e| remote_error(OP, e))?;
        Ok(())
    }
}
