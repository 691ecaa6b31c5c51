//! # Digests
//!
//! Keccak-256 for everything that must agree with EVM-side hashing (name
//! hashes, address checksums, CREATE2, DKIM domain keys) and SHA-256 for the
//! mock proof system.

use sha2::Sha256;
use sha3::{Digest, Keccak256};

/// Keccak-256 of raw bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let hash = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// SHA-256 of raw bytes.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// Incremental SHA-256 for composite inputs (domain tag followed by a
/// sequence of field elements, for instance).
#[derive(Clone, Default)]
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl std::fmt::Debug for Sha256Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha256Accumulator").finish_non_exhaustive()
    }
}

impl Sha256Accumulator {
    /// Start an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb more bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Consume the accumulator and return the 32-byte digest.
    pub fn finalize(self) -> [u8; 32] {
        let hash = self.hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        out
    }
}
