//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`ClaimError`] is the only error a claim operation returns. Every
//!   variant is fatal and non-retryable by the registrar itself.
//! - [`ProofRejection`] refines `ProofInvalid` so operators can tell a
//!   field-range failure from a masked-command mismatch without parsing text.
//! - [`ParseError`] covers textual decoding of the fixed-width newtypes.

use thiserror::Error;

use crate::identity::{Address, Nullifier};

/// Why a command's proof was judged invalid.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofRejection {
    /// A proof word or public input is not below the field modulus.
    #[error("value outside the scalar field")]
    FieldOutOfRange,
    /// The proof bytes do not have the expected word layout.
    #[error("malformed proof bytes")]
    MalformedProof,
    /// The external verifier returned false or failed.
    #[error("proof rejected by verifier")]
    VerifierRejected,
    /// The masked command differs from the reconstruction of the claimed parameters.
    #[error("masked command does not match claimed parameters")]
    CommandMismatch,
    /// An operation-specific structural check failed.
    #[error("claimed parameters are inconsistent with the proven identity")]
    StructureMismatch,
    /// The public inputs cannot be packed into the circuit layout.
    #[error("public inputs do not fit the circuit layout")]
    Encoding,
}

/// Rejection reason for a claim operation.
///
/// No claim partially succeeds: when any of these is returned, no state was
/// committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// The command payload could not be decoded.
    #[error("malformed command: {0}")]
    Format(String),

    /// The sender domain / key hash pair is not currently trusted.
    #[error("DKIM key is not trusted for domain {domain}")]
    DkimKeyInvalid {
        /// The sender domain carried by the public inputs.
        domain: String,
    },

    /// The cryptographic check, range check, or template binding failed.
    #[error("invalid proof: {0}")]
    ProofInvalid(ProofRejection),

    /// The nullifier was consumed by an earlier successful claim.
    #[error("nullifier {0} has already been used")]
    NullifierReused(Nullifier),

    /// The operation would mutate a record the caller is not authorized for.
    #[error("insufficient authorization: {0}")]
    InsufficientAuthorization(String),

    /// Crediting the account would overflow its balance.
    #[error("balance overflow crediting {account}")]
    BalanceOverflow {
        /// The account being credited.
        account: Address,
    },
}

impl From<ProofRejection> for ClaimError {
    fn from(reason: ProofRejection) -> Self {
        Self::ProofInvalid(reason)
    }
}

/// Error decoding a textual field element, address, or 32-byte value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input string was empty.
    #[error("empty input")]
    Empty,

    /// The input contained non-hex characters.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The decoded value has the wrong width.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected byte width.
        expected: usize,
        /// Actual byte width.
        actual: usize,
    },

    /// A decimal string contained a non-digit.
    #[error("invalid decimal digit {0:?}")]
    InvalidDigit(char),

    /// A decimal string was rejected by the integer parser.
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    /// The value does not fit in 256 bits.
    #[error("value exceeds 256 bits")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_rejection_converts_into_claim_error() {
        let err: ClaimError = ProofRejection::CommandMismatch.into();
        assert_eq!(err, ClaimError::ProofInvalid(ProofRejection::CommandMismatch));
    }

    #[test]
    fn replay_is_distinguishable_from_bad_proof() {
        let replay = ClaimError::NullifierReused(Nullifier::new([7u8; 32]));
        let bad = ClaimError::ProofInvalid(ProofRejection::VerifierRejected);
        assert!(matches!(replay, ClaimError::NullifierReused(_)));
        assert!(!matches!(bad, ClaimError::NullifierReused(_)));
    }

    #[test]
    fn display_includes_context() {
        let err = ClaimError::DkimKeyInvalid {
            domain: "x.com".to_string(),
        };
        assert!(err.to_string().contains("x.com"));
    }
}
