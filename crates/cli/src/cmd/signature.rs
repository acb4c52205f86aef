//! Signature deduplication

use crate::config::Config;
use crate::util;
use anyhow::{Context, Result};
use hashtree_core::MappedFileGuard;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(config: &Config, file: &Path, save: bool) -> Result<()> {
    let guard = MappedFileGuard::new(config.mmap).context("Invalid mapping configuration")?;
    let leaf_store = util::open_store(config)?;

    let (digest, existed) = guard
        .with_region(file, |signature| -> Result<_> {
            let digest = leaf_store.algorithm().digest(signature);
            let existed = leaf_store.check_signature_exists(signature)?;
            if save && !existed {
                leaf_store.save_signature(signature)?;
            }
            Ok((digest, existed))
        })
        .with_context(|| format!("Failed to map {}", file.display()))?
        .context("Failed to check signature")?;

    let digest = digest.to_hex();
    if existed {
        println!("{} Signature {} already exists", "!".yellow(), digest.cyan());
    } else if save {
        leaf_store.flush().context("Failed to flush leaf store")?;
        println!("{} Saved signature {}", "✓".green(), digest.cyan());
    } else {
        println!("{} Signature {} is new", "•".cyan(), digest.cyan());
    }

    Ok(())
}
