//! Random leaf data for experimenting

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rand::RngCore;
use std::path::Path;

pub fn run(out: &Path, size: usize) -> Result<()> {
    let mut data = vec![0u8; size];
    rand::thread_rng()
        .try_fill_bytes(&mut data)
        .context("Failed to generate random data")?;

    std::fs::write(out, &data).with_context(|| format!("Failed to write {}", out.display()))?;
    println!("{} Wrote {} random bytes to {}", "✓".green(), size, out.display());
    Ok(())
}
