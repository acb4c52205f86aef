//! Shared utilities for CLI commands

use crate::config::Config;
use anyhow::{Context, Result};
use leafstore::{LeafStore, SledBackend};

/// Open the configured leaf store, creating its directory if needed
pub fn open_store(config: &Config) -> Result<LeafStore<SledBackend>> {
    let path = &config.store.path;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let backend = SledBackend::open(path)
        .with_context(|| format!("Failed to open leaf store at {}", path.display()))?;
    Ok(LeafStore::with_algorithm(backend, config.tree.algorithm))
}

/// Format size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
