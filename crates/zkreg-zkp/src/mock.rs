//! # Mock Proof Verifier
//!
//! A deterministic, transparent stand-in for a Groth16 verifier. The
//! "proof" for a set of public inputs is eight SHA-256 words derived from
//! those inputs, so anyone can produce one.
//!
//! **NOT SOUND.** It exists for local development, the `zkreg prove`
//! command and tests. Never wire it into a registrar that holds value.
//!
//! ```text
//! seed    = SHA256(tag || input_0 || ... || input_423)
//! word_i  = SHA256(seed || i) with the top three bits cleared
//! proof   = word_0 || ... || word_7
//! ```
//!
//! Clearing the top bits keeps every word below the scalar modulus, so
//! mock proofs pass the range check like real ones do.

use zkreg_core::{FieldElement, Sha256Accumulator};

use crate::traits::{ProofVerifier, VerifyError, PROOF_BYTES, PROOF_WORDS};

const MOCK_PROOF_TAG: &[u8] = b"zkreg.mock-proof.v1";

/// SHA-256 mock prover and verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProofVerifier;

impl MockProofVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Produce the mock proof for `public_inputs`.
    pub fn prove(&self, public_inputs: &[FieldElement]) -> Vec<u8> {
        let mut acc = Sha256Accumulator::new();
        acc.update(MOCK_PROOF_TAG);
        for input in public_inputs {
            acc.update(input.as_be_bytes());
        }
        let seed = acc.finalize();

        let mut proof = Vec::with_capacity(PROOF_BYTES);
        for i in 0..PROOF_WORDS {
            let mut acc = Sha256Accumulator::new();
            acc.update(&seed);
            acc.update(&[i as u8]);
            let mut word = acc.finalize();
            word[0] &= 0x1f;
            proof.extend_from_slice(&word);
        }
        proof
    }
}

impl ProofVerifier for MockProofVerifier {
    fn verify(&self, proof: &[u8], public_inputs: &[FieldElement]) -> Result<bool, VerifyError> {
        if proof.len() != PROOF_BYTES {
            return Err(VerifyError::MalformedProof(format!(
                "expected {PROOF_BYTES} bytes, got {}",
                proof.len()
            )));
        }
        Ok(proof == self.prove(public_inputs).as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> Vec<FieldElement> {
        (0..10).map(FieldElement::from_u64).collect()
    }

    #[test]
    fn proof_is_deterministic_and_canonical() {
        let mock = MockProofVerifier::new();
        let a = mock.prove(&inputs());
        assert_eq!(a, mock.prove(&inputs()));
        assert_eq!(a.len(), PROOF_BYTES);
        for chunk in a.chunks_exact(32) {
            let mut word = [0u8; 32];
            word.copy_from_slice(chunk);
            assert!(FieldElement::from_be_bytes(word).is_canonical());
        }
    }

    #[test]
    fn verify_accepts_own_proof() {
        let mock = MockProofVerifier::new();
        let proof = mock.prove(&inputs());
        assert!(mock.verify(&proof, &inputs()).unwrap());
    }

    #[test]
    fn verify_rejects_other_inputs() {
        let mock = MockProofVerifier::new();
        let proof = mock.prove(&inputs());
        let mut other = inputs();
        other[3] = FieldElement::from_u64(99);
        assert!(!mock.verify(&proof, &other).unwrap());
    }

    #[test]
    fn verify_errors_on_wrong_length() {
        let mock = MockProofVerifier::new();
        assert!(matches!(
            mock.verify(&[0u8; 31], &inputs()),
            Err(VerifyError::MalformedProof(_))
        ));
    }
}
