//! Commit a file to a hash tree

use crate::config::Config;
use crate::util;
use anyhow::{Context, Result};
use hashtree_core::{write_root, MappedFileGuard, TreeBuilder};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(
    config: &Config,
    file: &Path,
    root_out: Option<&Path>,
    store: bool,
    leaf_size: Option<usize>,
) -> Result<()> {
    let leaf_size = leaf_size.unwrap_or(config.tree.leaf_size);

    // 1. Map the source file
    let guard = MappedFileGuard::new(config.mmap).context("Invalid mapping configuration")?;
    let region = guard
        .open(file)
        .with_context(|| format!("Failed to map {}", file.display()))?;

    // 2. Split into leaves and build the tree
    let leaves = region.leaves(leaf_size).context("Invalid leaf size")?;
    let tree = TreeBuilder::new(config.tree.algorithm)
        .build(&leaves)
        .with_context(|| format!("Failed to build hash tree for {}", file.display()))?;
    let root = tree.root_digest();

    // 3. Optionally persist the leaves, replacing any previous set
    if store {
        let leaf_store = util::open_store(config)?;
        let cleared = leaf_store.clear_leaves().context("Failed to clear old leaves")?;
        let written = if config.store.batch {
            leaf_store.store_leaves_batch(&leaves)
        } else {
            leaf_store.store_leaves(&leaves)
        }
        .context("Failed to store leaves")?;
        leaf_store.flush().context("Failed to flush leaf store")?;

        tracing::info!(cleared, written, "replaced stored leaves");
        println!(
            "{} Stored {} leaves in {}",
            "✓".green(),
            written,
            config.store.path.display()
        );
    }

    let size = region.len() as u64;
    region.close();

    // 4. Optionally write the root artifact
    if let Some(path) = root_out {
        write_root(path, &root)
            .with_context(|| format!("Failed to write root to {}", path.display()))?;
        println!("{} Wrote root to {}", "✓".green(), path.display());
    }

    println!("{} {}", "Root:".bold(), root.to_hex().green());
    println!(
        "{}",
        format!(
            "{} leaves of {} bytes, height {}, {} ({})",
            tree.leaf_count(),
            leaf_size,
            tree.height(),
            config.tree.algorithm,
            util::format_size(size)
        )
        .dimmed()
    );

    Ok(())
}
