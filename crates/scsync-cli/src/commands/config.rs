use anyhow::{Context, Result};
use scsync_engine::SyncConfig;

/// Prints the merged file + environment configuration.
pub fn show(cfg: &SyncConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(cfg).context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
