//! Pipeline job handling.
//!
//! A job event names one input artifact in object storage. The runner
//! downloads and unpacks it, runs a pass, and reports the outcome back to the
//! pipeline. Any failure after the job id is known is reported as a job
//! failure instead of being returned.

use scsync_catalog::{DynJobReporter, DynObjectStore};
use serde::Deserialize;
use serde_json::Value;

use crate::artifact::ArtifactSource;
use crate::driver::{CatalogSync, SyncReport};
use crate::error::{SyncError, SyncResult};

pub const SUCCESS_MESSAGE: &str = "Success";
pub const FAILURE_PREFIX: &str = "Function exception: ";

#[derive(Debug, Deserialize)]
struct PipelineEvent {
    #[serde(rename = "CodePipeline.job")]
    job: PipelineJob,
}

#[derive(Debug, Deserialize)]
struct PipelineJob {
    id: String,
    data: JobData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobData {
    input_artifacts: Vec<InputArtifact>,
    #[serde(default)]
    action_configuration: Option<ActionConfiguration>,
}

#[derive(Debug, Deserialize)]
struct InputArtifact {
    location: ArtifactLocation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactLocation {
    s3_location: S3Location,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S3Location {
    bucket_name: String,
    object_key: String,
}

#[derive(Debug, Deserialize)]
struct ActionConfiguration {
    #[serde(default)]
    configuration: Option<ActionSettings>,
}

#[derive(Debug, Deserialize)]
struct ActionSettings {
    #[serde(rename = "UserParameters", default)]
    user_parameters: Option<String>,
}

/// Optional JSON passed through the action's `UserParameters`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParameters {
    #[serde(default)]
    pub template_bucket: Option<String>,
}

/// A decoded pipeline job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub job_id: String,
    pub artifact_bucket: String,
    pub artifact_key: String,
    pub parameters: UserParameters,
}

/// Extracts only the job id, so failures can be reported even when the rest
/// of the event is malformed.
pub fn job_id(event: &Value) -> SyncResult<String> {
    event
        .get("CodePipeline.job")
        .and_then(|job| job.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SyncError::JobDecode("missing CodePipeline.job.id".into()))
}

pub fn decode_job(event: &Value) -> SyncResult<JobRequest> {
    let event = PipelineEvent::deserialize(event)
        .map_err(|e| SyncError::JobDecode(e.to_string()))?;
    let job = event.job;

    let Some(artifact) = job.data.input_artifacts.into_iter().next() else {
        return Err(SyncError::JobDecode("job has no input artifacts".into()));
    };

    let raw_parameters = job
        .data
        .action_configuration
        .and_then(|a| a.configuration)
        .and_then(|c| c.user_parameters)
        .filter(|p| !p.trim().is_empty());
    let parameters = match raw_parameters {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            SyncError::JobDecode(format!("UserParameters could not be decoded as JSON: {e}"))
        })?,
        None => UserParameters::default(),
    };

    Ok(JobRequest {
        job_id: job.id,
        artifact_bucket: artifact.location.s3_location.bucket_name,
        artifact_key: artifact.location.s3_location.object_key,
        parameters,
    })
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Succeeded(SyncReport),
    /// Failure message as reported to the pipeline.
    Failed(String),
}

/// Runs pipeline jobs end to end.
#[derive(Clone)]
pub struct JobRunner {
    sync: CatalogSync,
    objects: DynObjectStore,
    reporter: DynJobReporter,
}

impl JobRunner {
    pub fn new(sync: CatalogSync, objects: DynObjectStore, reporter: DynJobReporter) -> Self {
        Self {
            sync,
            objects,
            reporter,
        }
    }

    /// Processes one job event and reports its outcome.
    ///
    /// # Errors
    ///
    /// Only when the job id cannot be read or reporting itself fails.
    pub async fn handle(&self, event: &Value) -> SyncResult<JobStatus> {
        let job_id = job_id(event)?;
        tracing::info!(job = %job_id, "processing pipeline job");

        match self.execute(event).await {
            Ok(report) => {
                self.reporter.put_job_success(&job_id, SUCCESS_MESSAGE).await?;
                tracing::info!(job = %job_id, "job succeeded");
                Ok(JobStatus::Succeeded(report))
            }
            Err(err) => {
                let message = format!("{FAILURE_PREFIX}{err}");
                tracing::error!(
                    job = %job_id,
                    category = err.category(),
                    input = err.is_input_error(),
                    error = %err,
                    "job failed"
                );
                self.reporter.put_job_failure(&job_id, &message).await?;
                Ok(JobStatus::Failed(message))
            }
        }
    }

    async fn execute(&self, event: &Value) -> SyncResult<SyncReport> {
        let request = decode_job(event)?;
        let template_bucket = request
            .parameters
            .template_bucket
            .clone()
            .or_else(|| self.sync.settings().template_bucket.clone())
            .unwrap_or_else(|| request.artifact_bucket.clone());

        tracing::debug!(
            bucket = %request.artifact_bucket,
            key = %request.artifact_key,
            "downloading artifact"
        );
        let bytes = self
            .objects
            .get_object(&request.artifact_bucket, &request.artifact_key)
            .await?;
        let source = ArtifactSource::from_zip_bytes(&bytes)?;

        self.sync.run(source.root(), &template_bucket).await
    }
}
