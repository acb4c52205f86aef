//! Show a stored leaf

use crate::config::Config;
use crate::util;
use anyhow::{Context, Result};
use leafstore::StoreError;
use owo_colors::OwoColorize;

pub fn run(config: &Config, index: usize) -> Result<()> {
    let leaf_store = util::open_store(config)?;

    match leaf_store.fetch_leaf_at(index) {
        Ok(leaf) => {
            println!("{} {}", "Leaf:".bold(), index);
            println!("  {} {}", "Size:".dimmed(), util::format_size(leaf.len() as u64));
            println!(
                "  {} {}",
                "Digest:".dimmed(),
                leaf_store.algorithm().digest(&leaf).to_hex().cyan()
            );
            Ok(())
        }
        Err(StoreError::NotFound { .. }) => {
            println!("{}", format!("Leaf {} is not stored", index).yellow());
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to fetch leaf {}", index)),
    }
}
