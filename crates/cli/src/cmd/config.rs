//! Show configuration

use crate::config::{self, Config};
use anyhow::{Context, Result};

/// Print the effective configuration as TOML
pub fn run_show(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}

/// Print the example configuration
pub fn run_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}
