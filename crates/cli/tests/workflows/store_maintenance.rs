//! Fetch, prune, signature and config workflows

use crate::htree;
use anyhow::Result;
use hashtree_core::hash_bytes;

#[test]
fn test_fetch_and_prune() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data: Vec<u8> = (0..300u32).map(|i| (i % 256) as u8).collect();
    std::fs::write(dir.path().join("data.bin"), &data)?;

    htree!(dir.path(), "build", "data.bin", "--leaf-size", "100", "--store").assert_success()?;

    let fetched = htree!(dir.path(), "fetch", "0").assert_success()?;
    assert_eq!(fetched.parse_digest(), Some(hash_bytes(&data[..100]).to_hex()));

    let pruned = htree!(dir.path(), "prune", "3").assert_success()?;
    assert!(pruned.contains_stdout("Pruned"));

    // Second prune over the same range is not an error
    let again = htree!(dir.path(), "prune", "3").assert_success()?;
    assert!(again.contains_stdout("Nothing to prune"));

    let missing = htree!(dir.path(), "fetch", "0").assert_success()?;
    assert!(missing.contains_stdout("not stored"));
    Ok(())
}

#[test]
fn test_rebuild_after_prune_verifies() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("long.bin"), vec![7u8; 1000])?;
    std::fs::write(dir.path().join("short.bin"), vec![9u8; 500])?;

    htree!(dir.path(), "build", "long.bin", "--leaf-size", "100", "--store").assert_success()?;
    htree!(dir.path(), "prune", "3").assert_success()?;

    htree!(
        dir.path(),
        "build",
        "short.bin",
        "--leaf-size",
        "100",
        "--store",
        "--root-out",
        "root.bin"
    )
    .assert_success()?;

    let verified = htree!(dir.path(), "verify", "root.bin").assert_success()?;
    assert!(verified.contains_stdout("match root"));

    let beyond = htree!(dir.path(), "fetch", "5").assert_success()?;
    assert!(beyond.contains_stdout("not stored"));
    Ok(())
}

#[test]
fn test_signature_dedup() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("sig.bin"), b"signature bytes")?;
    std::fs::write(dir.path().join("other.bin"), b"other signature")?;

    let first = htree!(dir.path(), "signature", "sig.bin").assert_success()?;
    assert!(first.contains_stdout("is new"));

    let saved = htree!(dir.path(), "signature", "sig.bin", "--save").assert_success()?;
    assert!(saved.contains_stdout("Saved"));
    assert_eq!(saved.parse_digest(), Some(hash_bytes(b"signature bytes").to_hex()));

    let seen = htree!(dir.path(), "signature", "sig.bin", "--save").assert_success()?;
    assert!(seen.contains_stdout("already exists"));

    let other = htree!(dir.path(), "signature", "other.bin").assert_success()?;
    assert!(other.contains_stdout("is new"));
    Ok(())
}

#[test]
fn test_config_output() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let example = htree!(dir.path(), "config", "--example").assert_success()?;
    assert!(example.contains_stdout("limit_gib = 1"));

    let shown = htree!(dir.path(), "config").assert_success()?;
    assert!(shown.contains_stdout("leaf_size = 4096"));
    assert!(shown.contains_stdout("algorithm = \"sha256\""));
    Ok(())
}

#[test]
fn test_invalid_config_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("htree.toml"), "[mmap]\nlimit_gib = 0\n")?;
    std::fs::write(dir.path().join("data.bin"), b"abc")?;

    let result = htree!(dir.path(), "build", "data.bin").assert_failure()?;
    assert!(result.contains_stderr("Failed to load configuration"));
    Ok(())
}

#[test]
fn test_zero_leaf_size_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("data.bin"), b"abc")?;

    let result = htree!(dir.path(), "build", "data.bin", "--leaf-size", "0").assert_failure()?;
    assert!(result.contains_stderr("leaf size"));
    Ok(())
}
