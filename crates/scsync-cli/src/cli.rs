use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scsync")]
#[command(about = "Reconcile service-catalog portfolios with declarative manifests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (overrides SCSYNC_CONFIG and ./scsync.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configured level; RUST_LOG wins over both)
    #[arg(long, global = true, env = "SCSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one reconciliation pass over a local artifact
    Sync(SyncArgs),
    /// Process a pipeline job event and report the result
    Job(JobArgs),
    /// Print the content digest of a template file
    Digest(DigestArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args)]
pub struct SyncArgs {
    /// Artifact zip file or an already extracted directory
    #[arg(short, long)]
    pub source: PathBuf,
    /// Bucket holding the templates (defaults to catalog.template_bucket)
    #[arg(short, long)]
    pub bucket: Option<String>,
}

#[derive(clap::Args)]
pub struct JobArgs {
    /// Event JSON file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub event: String,
}

#[derive(clap::Args)]
pub struct DigestArgs {
    /// Template file
    pub file: PathBuf,
}
