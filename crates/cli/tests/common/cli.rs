//! CLI command execution helpers
//!
//! Wraps the `htree` binary built for this test run and provides
//! convenient assertion methods.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// CLI command builder
pub struct HtreeCommand {
    working_dir: PathBuf,
    args: Vec<String>,
}

impl HtreeCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Execute command and capture its output
    pub fn execute(&self) -> Result<CommandResult> {
        let output = Command::new(env!("CARGO_BIN_EXE_htree"))
            .args(&self.args)
            .current_dir(&self.working_dir)
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to execute htree")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// First 64-character hex digest printed on stdout
    pub fn parse_digest(&self) -> Option<String> {
        self.stdout.lines().find_map(extract_digest)
    }
}

/// Extract a 64-character lowercase hex run from a line
pub fn extract_digest(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    let mut run_start = None;

    for i in 0..=bytes.len() {
        let is_hex = i < bytes.len() && matches!(bytes[i], b'0'..=b'9' | b'a'..=b'f');
        match (is_hex, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                if i - start == 64 {
                    return Some(line[start..i].to_string());
                }
                run_start = None;
            }
            _ => {}
        }
    }

    None
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// htree!(dir, "build", "data.bin").assert_success()?;
/// ```
#[macro_export]
macro_rules! htree {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::HtreeCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_extraction() {
        let hex = "ab".repeat(32);
        let line = format!("Root: \u{1b}[32m{}\u{1b}[39m", hex);
        assert_eq!(extract_digest(&line), Some(hex));
    }

    #[test]
    fn test_digest_extraction_ignores_short_runs() {
        assert_eq!(extract_digest("leaf-12 deadbeef"), None);
        assert_eq!(extract_digest(&"a".repeat(65)), None);
    }
}
