//! Delete stored leaves

use crate::config::Config;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub fn run(config: &Config, count: usize) -> Result<()> {
    let leaf_store = util::open_store(config)?;
    let removed = leaf_store
        .prune_leaves(count)
        .with_context(|| format!("Failed to prune {} leaves", count))?;
    leaf_store.flush().context("Failed to flush leaf store")?;

    if removed == 0 {
        println!("{}", "Nothing to prune".dimmed());
    } else {
        println!("{} Pruned {} leaves", "✓".green(), removed.to_string().yellow());
    }
    Ok(())
}
