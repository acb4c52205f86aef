//! Configuration file (`htree.toml`)
//!
//! Every field has a default, so a missing file or a partial file is fine.

use anyhow::{Context, Result};
use hashtree_core::chunk::DEFAULT_LEAF_SIZE;
use hashtree_core::{GuardConfig, HashAlgorithm};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "htree.toml";

/// Full configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Memory-mapping limits
    #[serde(default)]
    pub mmap: GuardConfig,

    /// Tree construction
    #[serde(default)]
    pub tree: TreeConfig,

    /// Leaf store
    #[serde(default)]
    pub store: StoreConfig,
}

/// Tree construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Digest algorithm (default: sha256)
    #[serde(default)]
    pub algorithm: HashAlgorithm,

    /// Leaf size in bytes when splitting files (default: 4096)
    #[serde(default = "default_leaf_size")]
    pub leaf_size: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            leaf_size: default_leaf_size(),
        }
    }
}

/// Leaf store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database directory (default: .htree/leaves.db)
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Write leaves in one atomic batch (default: true)
    #[serde(default = "default_true")]
    pub batch: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            batch: true,
        }
    }
}

fn default_leaf_size() -> usize {
    DEFAULT_LEAF_SIZE
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".htree/leaves.db")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Reject values the library would refuse later
    pub fn validate(&self) -> Result<()> {
        self.mmap.validate().context("Invalid [mmap] section")?;
        if self.tree.leaf_size == 0 {
            anyhow::bail!("tree.leaf_size must be greater than zero");
        }
        Ok(())
    }
}

/// Load configuration
///
/// An explicit path must exist. Without one, `./htree.toml` is used when
/// present and defaults otherwise.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if !path.exists() {
        if required {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        tracing::debug!("no config file, using defaults");
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Example configuration with every key at its default
pub fn example_config() -> &'static str {
    r#"# htree configuration

[mmap]
# Largest file that may be mapped, in GiB
limit_gib = 1

[tree]
# Digest algorithm: "sha256" or "blake3"
algorithm = "sha256"
# Leaf size in bytes when splitting files
leaf_size = 4096

[store]
# Leaf database directory
path = ".htree/leaves.db"
# Write leaves in one atomic batch
batch = true
"#
}
