//! # zkreg-core — Foundational Types
//!
//! The leaf of the zkreg crate DAG. Defines the primitives every other crate
//! speaks in:
//!
//! - [`FieldElement`]: a 256-bit value that is only meaningful on the proof
//!   wire when strictly below the BN254 scalar modulus.
//! - [`Address`], [`Bytes32`], [`Nullifier`], [`IdentityNode`]: fixed-width
//!   newtypes. You cannot pass a nullifier where an identity node is expected.
//! - [`digest`]: keccak-256 and SHA-256 over raw bytes.
//! - [`ClaimError`]: the typed rejection taxonomy surfaced by every claim
//!   operation. Callers branch on variants, never on message text.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkreg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod field;
pub mod identity;

pub use digest::{keccak256, sha256, Sha256Accumulator};
pub use error::{ClaimError, ParseError, ProofRejection};
pub use field::{FieldElement, SCALAR_FIELD_MODULUS};
pub use identity::{Address, Bytes32, IdentityNode, Nullifier};
