//! # zkreg-zkp — Proof-Gated Command Verification
//!
//! Everything needed to decide whether a command is backed by a valid
//! email proof, without touching registrar state.
//!
//! ## Architecture
//!
//! - **Codec** (`codec.rs`): packs typed values into the fixed-width
//!   field-element layout the circuit expects, and back.
//! - **Public inputs** (`public_inputs.rs`): the canonical 424-element layout
//!   of a [`PublicInputSet`].
//! - **Templates** (`template.rs`): reconstructs the masked command sentence
//!   from claimed parameters, and extracts parameters from it.
//! - **Traits** (`traits.rs`): the [`ProofVerifier`] and [`DkimKeyOracle`]
//!   capabilities the core consumes but does not implement.
//! - **Mock** (`mock.rs`): a transparent SHA-256 stand-in verifier for
//!   development and tests. Provides no zero-knowledge guarantees.
//! - **DKIM** (`dkim.rs`): in-memory key-hash registry implementing the oracle.
//! - **Commands** (`command.rs`, `kinds.rs`): the `Command<P>` envelope and
//!   the three operation kinds (withdraw, link text record, claim name).
//! - **Verifier** (`verifier.rs`): the generic [`CommandVerifier`].
//!
//! ## Crate Policy
//!
//! - Verification is pure. Nothing in this crate mutates claim state.
//! - Proof words and public inputs are range-checked before any external
//!   verifier sees them.

pub mod codec;
pub mod command;
pub mod dkim;
pub mod kinds;
#[cfg(feature = "mock")]
pub mod mock;
pub mod public_inputs;
pub mod template;
pub mod traits;
pub mod verifier;

pub use codec::CodecError;
pub use command::{encode_command, Command, CommandKind};
pub use dkim::{dkim_domain_hash, DkimRegistry};
pub use kinds::{ClaimEmailName, ClaimNameParams, LinkParams, LinkTextRecord, WithdrawAll, WithdrawParams};
#[cfg(feature = "mock")]
pub use mock::MockProofVerifier;
pub use public_inputs::{PublicInputSet, PUBLIC_INPUT_COUNT};
pub use template::{
    build_expected_command, extract_param, AddressCasing, CommandTemplate, ParamKind,
    TemplateError, TemplateValue,
};
pub use traits::{DkimKeyOracle, ProofVerifier, VerifyError, PROOF_BYTES, PROOF_WORDS};
pub use verifier::{check_field_range, CommandVerifier};
