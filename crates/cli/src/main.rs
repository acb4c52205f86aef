//! Hashtree CLI - htree command

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;
mod util;

/// Hashtree - commit files to a hash tree and keep their leaves
#[derive(Parser)]
#[command(name = "htree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./htree.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a file, split it into leaves and print the root digest
    Build {
        /// File to commit
        file: PathBuf,
        /// Write the raw root digest to this file
        #[arg(long)]
        root_out: Option<PathBuf>,
        /// Persist the leaves to the leaf store
        #[arg(long)]
        store: bool,
        /// Leaf size in bytes (default: from config)
        #[arg(long)]
        leaf_size: Option<usize>,
    },
    /// Rebuild the tree from stored leaves and compare with a root file
    Verify {
        /// Root artifact written by `build --root-out`
        root_file: PathBuf,
    },
    /// Show a stored leaf
    Fetch {
        /// Leaf index
        index: usize,
    },
    /// Delete the first N stored leaves
    Prune {
        /// Number of leaves to delete
        count: usize,
    },
    /// Check whether a file's contents were already saved as a signature
    Signature {
        /// File holding the signature bytes
        file: PathBuf,
        /// Save the signature when it is new
        #[arg(long)]
        save: bool,
    },
    /// Write random bytes to a file for experimenting
    Gen {
        /// Output file
        out: PathBuf,
        /// Number of bytes (default: 1 MiB)
        #[arg(long, default_value = "1048576")]
        size: usize,
    },
    /// Show the effective configuration
    Config {
        /// Print an example configuration file instead
        #[arg(long)]
        example: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Config { example: true } = cli.command {
        return cmd::config::run_example();
    }

    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Build {
            file,
            root_out,
            store,
            leaf_size,
        } => cmd::build::run(&config, &file, root_out.as_deref(), store, leaf_size),
        Commands::Verify { root_file } => cmd::verify::run(&config, &root_file),
        Commands::Fetch { index } => cmd::fetch::run(&config, index),
        Commands::Prune { count } => cmd::prune::run(&config, count),
        Commands::Signature { file, save } => cmd::signature::run(&config, &file, save),
        Commands::Gen { out, size } => cmd::generate::run(&out, size),
        Commands::Config { .. } => cmd::config::run_show(&config),
    }
}
