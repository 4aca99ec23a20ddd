use std::path::Path;

use anyhow::{Context, Result};

pub fn digest(file: &Path) -> Result<()> {
    let digest = scsync_core::digest(file)
        .with_context(|| format!("failed to hash {}", file.display()))?;
    println!("{digest}  {}", file.display());
    Ok(())
}
