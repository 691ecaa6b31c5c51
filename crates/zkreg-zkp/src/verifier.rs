//! # Command Verifier
//!
//! One generic verifier for every command kind. A command passes only if
//! all of the following hold, checked in this order:
//!
//! 1. The DKIM oracle trusts `(keccak256(sender_domain), public_key_hash)`.
//! 2. The public inputs pack into the circuit layout, every proof word and
//!    input is below the scalar modulus, and the proof verifier accepts.
//! 3. The masked command equals the template rendering of the claimed
//!    parameters under at least one configured address casing.
//! 4. The kind's structural check holds.
//!
//! The first failing step decides the error. Nothing here mutates state.

use zkreg_core::{ClaimError, FieldElement, ProofRejection};

use crate::command::{encode_command, Command, CommandKind};
use crate::dkim::dkim_domain_hash;
use crate::template::{build_expected_command, AddressCasing, TemplateError};
use crate::traits::{DkimKeyOracle, ProofVerifier, PROOF_BYTES};

/// Fail closed unless the proof has the expected shape and every proof word
/// and public input is a canonical field element.
pub fn check_field_range(proof: &[u8], public_inputs: &[FieldElement]) -> Result<(), ProofRejection> {
    if proof.len() != PROOF_BYTES {
        return Err(ProofRejection::MalformedProof);
    }
    for chunk in proof.chunks_exact(32) {
        let mut word = [0u8; 32];
        word.copy_from_slice(chunk);
        if !FieldElement::from_be_bytes(word).is_canonical() {
            return Err(ProofRejection::FieldOutOfRange);
        }
    }
    if public_inputs.iter().any(|f| !f.is_canonical()) {
        return Err(ProofRejection::FieldOutOfRange);
    }
    Ok(())
}

/// Verifies commands of kind `K` with proof verifier `V` and DKIM oracle `D`.
#[derive(Debug, Clone)]
pub struct CommandVerifier<K, V, D> {
    kind: K,
    proof_verifier: V,
    dkim: D,
    casings: Vec<AddressCasing>,
}

impl<K, V, D> CommandVerifier<K, V, D>
where
    K: CommandKind,
    V: ProofVerifier,
    D: DkimKeyOracle,
{
    /// A verifier accepting every address casing.
    pub fn new(kind: K, proof_verifier: V, dkim: D) -> Self {
        Self {
            kind,
            proof_verifier,
            dkim,
            casings: AddressCasing::ALL.to_vec(),
        }
    }

    /// Restrict the accepted address casings.
    pub fn with_casings(mut self, casings: Vec<AddressCasing>) -> Self {
        self.casings = casings;
        self
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn casings(&self) -> &[AddressCasing] {
        &self.casings
    }

    /// Run every check and return the first failure.
    pub fn check(&self, command: &Command<K::Params>) -> Result<(), ClaimError> {
        let inputs = &command.public_inputs;

        let domain_hash = dkim_domain_hash(&inputs.sender_domain);
        if !self.dkim.is_key_hash_valid(&domain_hash, &inputs.public_key_hash) {
            return Err(ClaimError::DkimKeyInvalid {
                domain: inputs.sender_domain.clone(),
            });
        }

        let fields = inputs.pack().map_err(|e| {
            tracing::debug!(error = %e, "public inputs do not pack");
            ProofRejection::Encoding
        })?;
        check_field_range(&command.proof, &fields)?;
        match self.proof_verifier.verify(&command.proof, &fields) {
            Ok(true) => {}
            Ok(false) => return Err(ProofRejection::VerifierRejected.into()),
            Err(e) => {
                tracing::debug!(error = %e, "proof verifier failed");
                return Err(ProofRejection::VerifierRejected.into());
            }
        }

        let values = self.kind.template_values(&command.params);
        let matched = self.casings.iter().any(|casing| {
            build_expected_command(&values, self.kind.template(), *casing)
                .is_ok_and(|expected| expected == inputs.masked_command)
        });
        if !matched {
            return Err(ProofRejection::CommandMismatch.into());
        }

        if !self.kind.check_structure(&command.params, inputs) {
            return Err(ProofRejection::StructureMismatch.into());
        }
        Ok(())
    }

    /// `true` iff [`check`](Self::check) passes.
    pub fn verify(&self, command: &Command<K::Params>) -> bool {
        self.check(command).is_ok()
    }

    /// The masked commands `params` would be accepted under, one per casing.
    pub fn expected_commands(&self, params: &K::Params) -> Result<Vec<String>, TemplateError> {
        let values = self.kind.template_values(params);
        self.casings
            .iter()
            .map(|casing| build_expected_command(&values, self.kind.template(), *casing))
            .collect()
    }

    /// Build a command of this kind from raw circuit output.
    pub fn encode(&self, proof: Vec<u8>, fields: &[FieldElement]) -> Result<Command<K::Params>, ClaimError> {
        encode_command(&self.kind, proof, fields)
    }
}
