mod cli;
mod commands;
mod output;

use anyhow::{Result, anyhow};
use clap::Parser;
use scsync_aws::{AwsBackend, AwsOptions};
use scsync_engine::config::loader::load_config_with_default_path;
use scsync_engine::observability;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Digest(args) = &cli.command {
        return commands::digest::digest(&args.file);
    }

    let cfg = load_config_with_default_path(cli.config.as_ref())
        .map_err(|e| anyhow!("configuration error: {e}"))?;
    let level = cli.log_level.as_deref().unwrap_or(&cfg.logging.level);
    observability::init_tracing_with_level(level);
    tracing::debug!(config = ?cli.config, log_level = level, "configuration loaded");

    if let Commands::Config = &cli.command {
        return commands::config::show(&cfg);
    }

    let backend = AwsBackend::connect(&AwsOptions {
        region: cfg.aws.region.clone(),
        endpoint_url: cfg.aws.endpoint_url.clone(),
    })
    .await;

    match &cli.command {
        Commands::Sync(args) => commands::sync::sync(&cfg, &backend, args).await?,
        Commands::Job(args) => commands::job::job(&cfg, &backend, args).await?,
        Commands::Digest(_) | Commands::Config => {}
    }

    Ok(())
}
