//! # Verification Capabilities
//!
//! The two external capabilities a command verifier consumes. Neither is
//! implemented by the core in production: the proof verifier wraps a real
//! Groth16 backend, and the DKIM oracle is backed by whatever registry the
//! deployment trusts.
//!
//! ## Security Invariant
//!
//! Both traits require `Send + Sync`, and both are pure from the caller's
//! point of view: asking the same question twice gives the same answer
//! unless the oracle's administrator changed it in between.

use std::sync::Arc;

use thiserror::Error;

use zkreg_core::{Bytes32, FieldElement};

/// Number of 32-byte words in a proof (Groth16 `a`, `b`, `c`).
pub const PROOF_WORDS: usize = 8;

/// Length of a proof in bytes.
pub const PROOF_BYTES: usize = PROOF_WORDS * 32;

/// Error raised by a proof verifier backend.
///
/// The command verifier treats any error as rejection.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof bytes are not a proof this backend understands.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The verifying key does not match the circuit.
    #[error("key mismatch: {0}")]
    KeyMismatch(String),
}

/// Verifies a proof against its public inputs.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, proof: &[u8], public_inputs: &[FieldElement]) -> Result<bool, VerifyError>;
}

/// Answers whether a DKIM public key hash is trusted for a sender domain.
///
/// `domain_hash` is `keccak256(sender_domain)`.
pub trait DkimKeyOracle: Send + Sync {
    fn is_key_hash_valid(&self, domain_hash: &Bytes32, key_hash: &Bytes32) -> bool;
}

impl<T: ProofVerifier + ?Sized> ProofVerifier for Arc<T> {
    fn verify(&self, proof: &[u8], public_inputs: &[FieldElement]) -> Result<bool, VerifyError> {
        (**self).verify(proof, public_inputs)
    }
}

impl<T: DkimKeyOracle + ?Sized> DkimKeyOracle for Arc<T> {
    fn is_key_hash_valid(&self, domain_hash: &Bytes32, key_hash: &Bytes32) -> bool {
        (**self).is_key_hash_valid(domain_hash, key_hash)
    }
}
