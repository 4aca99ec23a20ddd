use anyhow::{Context, Result};
use colored::Colorize;
use scsync_aws::AwsBackend;
use scsync_engine::{ArtifactSource, CatalogSync, SyncConfig};

use crate::cli::SyncArgs;
use crate::output::{print_report, print_success};

pub async fn sync(cfg: &SyncConfig, backend: &AwsBackend, args: &SyncArgs) -> Result<()> {
    let bucket = args
        .bucket
        .clone()
        .or_else(|| cfg.catalog.template_bucket.clone())
        .context("no template bucket: pass --bucket or set catalog.template_bucket")?;

    let source = ArtifactSource::open(&args.source)
        .with_context(|| format!("failed to open artifact {}", args.source.display()))?;

    let engine = CatalogSync::new(
        backend.catalog.clone(),
        backend.objects.clone(),
        backend.identity.clone(),
        cfg.catalog.clone(),
    );
    let report = engine.run(source.root(), &bucket).await?;

    print_report(&report);
    print_success(&format!(
        "Synced {} manifest(s) into {}",
        report.manifests.len(),
        bucket.cyan()
    ));
    Ok(())
}
