use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use squaregrid_core::AppConfig;

/// Print the config file location and the effective configuration, or write it
/// out with `init`
pub fn run(config: &AppConfig, path: &Path, path_only: bool, init: bool) -> Result<()> {
    if init {
        write_initial(config, path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    let state = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("# Config file: {}{}", path.display(), state);
    println!("# Log file: {}\n", config.log_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Save `config` to `path`, refusing to overwrite an existing file
fn write_initial(config: &AppConfig, path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    config.save_to(path)?;
    info!("Wrote config to {}", path.display());
    Ok(())
}
