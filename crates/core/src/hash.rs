//! 256-bit digest primitive shared by leaf and internal-node hashing

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use std::str::FromStr;

/// Length of every digest in bytes
pub const DIGEST_LEN: usize = 32;

/// A 32-byte digest
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Create a digest from raw bytes
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a digest from a slice that must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidDigest(format!(
                "expected {} bytes, got {}",
                DIGEST_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Get the digest as a byte array
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string
    pub fn from_hex(text: &str) -> Result<Self> {
        if text.len() != DIGEST_LEN * 2 {
            return Err(Error::InvalidDigest(format!(
                "expected {} hex characters, got {}",
                DIGEST_LEN * 2,
                text.len()
            )));
        }

        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(text, &mut bytes)
            .map_err(|e| Error::InvalidDigest(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash function backing a tree or store
///
/// Roots are only comparable between trees built with the same algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3 in its default 32-byte output mode
    Blake3,
}

impl HashAlgorithm {
    /// Hash bytes with this algorithm
    ///
    /// This is the only hashing entry point; leaves and internal nodes both
    /// go through it.
    pub fn digest(self, data: &[u8]) -> Digest {
        match self {
            HashAlgorithm::Sha256 => Digest(sha2::Sha256::digest(data).into()),
            HashAlgorithm::Blake3 => Digest(*blake3::hash(data).as_bytes()),
        }
    }

    /// Name as written in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown hash algorithm: {}",
                other
            ))),
        }
    }
}

/// Hash bytes using the default algorithm (SHA-256)
pub fn hash_bytes(data: &[u8]) -> Digest {
    HashAlgorithm::default().digest(data)
}
