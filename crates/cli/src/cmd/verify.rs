//! Re-verify stored leaves against a root artifact

use crate::config::Config;
use crate::util;
use anyhow::{Context, Result};
use hashtree_core::load_root;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(config: &Config, root_file: &Path) -> Result<()> {
    let expected = load_root(root_file)
        .with_context(|| format!("Failed to load root from {}", root_file.display()))?;

    let leaf_store = util::open_store(config)?;
    let matches = leaf_store
        .verify_root(&expected)
        .context("Failed to rebuild tree from stored leaves")?;

    if !matches {
        anyhow::bail!("Stored leaves do not match root {}", expected);
    }

    println!("{} Stored leaves match root {}", "✓".green(), expected.to_hex().cyan());
    Ok(())
}
