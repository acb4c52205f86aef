//! Build, persist and verify workflows

use crate::htree;
use anyhow::Result;
use hashtree_core::{build, load_root, HashAlgorithm, TreeBuilder};

fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_build_prints_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data = sample_data(10_000);
    std::fs::write(dir.path().join("data.bin"), &data)?;

    let result = htree!(dir.path(), "build", "data.bin", "--leaf-size", "1024").assert_success()?;

    let expected = build(data.chunks(1024))?.root_digest().to_hex();
    assert_eq!(result.parse_digest(), Some(expected));
    assert!(result.contains_stdout("Root:"));
    Ok(())
}

#[test]
fn test_build_store_verify() -> Result<()> {
    let dir = tempfile::tempdir()?;

    htree!(dir.path(), "gen", "data.bin", "--size", "20000").assert_success()?;
    let built = htree!(dir.path(), "build", "data.bin", "--root-out", "root.bin", "--store")
        .assert_success()?;
    assert!(built.contains_stdout("Stored 5 leaves"));

    let root = load_root(&dir.path().join("root.bin"))?;
    assert_eq!(built.parse_digest(), Some(root.to_hex()));

    let verified = htree!(dir.path(), "verify", "root.bin").assert_success()?;
    assert!(verified.contains_stdout("match root"));
    Ok(())
}

#[test]
fn test_verify_detects_replaced_leaves() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("a.bin"), sample_data(9000))?;
    std::fs::write(dir.path().join("b.bin"), vec![7u8; 5000])?;

    htree!(dir.path(), "build", "a.bin", "--root-out", "a.root", "--store").assert_success()?;
    htree!(dir.path(), "build", "b.bin", "--store").assert_success()?;

    let result = htree!(dir.path(), "verify", "a.root").assert_failure()?;
    assert!(result.contains_stderr("do not match"));
    Ok(())
}

#[test]
fn test_verify_rejects_corrupt_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("bad.root"), [0u8; 31])?;

    let result = htree!(dir.path(), "verify", "bad.root").assert_failure()?;
    assert!(result.contains_stderr("expected 32"));
    Ok(())
}

#[test]
fn test_build_empty_file_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("empty.bin"), b"")?;

    let result = htree!(dir.path(), "build", "empty.bin").assert_failure()?;
    assert!(result.contains_stderr("empty leaf sequence"));
    Ok(())
}

#[test]
fn test_build_missing_file_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let result = htree!(dir.path(), "build", "missing.bin").assert_failure()?;
    assert!(result.contains_stderr("Failed to map"));
    Ok(())
}

#[test]
fn test_blake3_from_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data = sample_data(3000);
    std::fs::write(dir.path().join("data.bin"), &data)?;
    std::fs::write(
        dir.path().join("htree.toml"),
        "[tree]\nalgorithm = \"blake3\"\nleaf_size = 1000\n",
    )?;

    let result = htree!(dir.path(), "build", "data.bin").assert_success()?;

    let expected = TreeBuilder::new(HashAlgorithm::Blake3)
        .build(data.chunks(1000))?
        .root_digest()
        .to_hex();
    assert_eq!(result.parse_digest(), Some(expected));
    Ok(())
}
