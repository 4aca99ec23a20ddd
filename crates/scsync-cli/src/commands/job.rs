use std::io::Read;

use anyhow::{Context, Result, bail};
use scsync_aws::AwsBackend;
use scsync_engine::{CatalogSync, JobRunner, JobStatus, SyncConfig};
use serde_json::Value;

use crate::cli::JobArgs;
use crate::output::{print_report, print_success};

fn read_event(source: &str) -> Result<Value> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {source}"))?
    };
    serde_json::from_str(&raw).context("event is not valid JSON")
}

pub async fn job(cfg: &SyncConfig, backend: &AwsBackend, args: &JobArgs) -> Result<()> {
    let event = read_event(&args.event)?;

    let engine = CatalogSync::new(
        backend.catalog.clone(),
        backend.objects.clone(),
        backend.identity.clone(),
        cfg.catalog.clone(),
    );
    let runner = JobRunner::new(engine, backend.objects.clone(), backend.jobs.clone());

    match runner.handle(&event).await? {
        JobStatus::Succeeded(report) => {
            print_report(&report);
            print_success("Job succeeded");
            Ok(())
        }
        JobStatus::Failed(message) => bail!("job reported as failed: {message}"),
    }
}
