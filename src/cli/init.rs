//! Init command: write a starter configuration

use std::path::Path;

use anyhow::{Context, Result, bail};

use pyscope::config;

/// Write a commented default pyscope.toml into `dir`
pub fn init_command(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join("pyscope.toml");
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::write(&path, config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {}", path.display());
    Ok(())
}
