//! # Commands
//!
//! A [`Command`] is what a relayer submits: the public inputs, the proof
//! bytes, and the operation-specific parameters the masked subject line is
//! supposed to encode. Its wire form is JSON.
//!
//! A [`CommandKind`] describes one operation: which template binds its
//! parameters, how to recover the parameters from a masked subject, and any
//! structural consistency rule beyond the template.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use zkreg_core::{ClaimError, FieldElement, Nullifier};

use crate::public_inputs::PublicInputSet;
use crate::template::{extract_param, CommandTemplate, ParamKind, TemplateValue};

/// A proof-carrying command with parameters of type `P`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command<P> {
    pub public_inputs: PublicInputSet,
    #[serde(with = "hex_bytes")]
    pub proof: Vec<u8>,
    pub params: P,
}

impl<P> Command<P> {
    pub fn nullifier(&self) -> Nullifier {
        self.public_inputs.nullifier
    }

    /// The email address or handle the proof speaks for.
    pub fn claimed_identity(&self) -> &str {
        &self.public_inputs.claimed_identity
    }
}

impl<P: Serialize> Command<P> {
    /// JSON wire encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ClaimError> {
        serde_json::to_vec(self).map_err(|e| ClaimError::Format(e.to_string()))
    }
}

impl<P: DeserializeOwned> Command<P> {
    /// Decode the JSON wire encoding. Public inputs that do not fit the
    /// circuit layout are rejected here too. Any failure is
    /// [`ClaimError::Format`].
    pub fn from_bytes(raw: &[u8]) -> Result<Self, ClaimError> {
        let command: Self =
            serde_json::from_slice(raw).map_err(|e| ClaimError::Format(e.to_string()))?;
        command
            .public_inputs
            .pack()
            .map_err(|e| ClaimError::Format(e.to_string()))?;
        Ok(command)
    }
}

/// One proof-gated operation.
pub trait CommandKind {
    type Params: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned;

    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;

    fn template(&self) -> &CommandTemplate;

    /// The parameters in placeholder order.
    fn template_values(&self, params: &Self::Params) -> Vec<TemplateValue>;

    /// Recover the parameters from decoded public inputs.
    fn params_from_inputs(&self, inputs: &PublicInputSet) -> Result<Self::Params, ClaimError>;

    /// Operation-specific consistency between parameters and inputs.
    fn check_structure(&self, _params: &Self::Params, _inputs: &PublicInputSet) -> bool {
        true
    }
}

/// Build a command from raw circuit output.
pub fn encode_command<K: CommandKind>(
    kind: &K,
    proof: Vec<u8>,
    fields: &[FieldElement],
) -> Result<Command<K::Params>, ClaimError> {
    let public_inputs =
        PublicInputSet::unpack(fields).map_err(|e| ClaimError::Format(e.to_string()))?;
    let params = kind.params_from_inputs(&public_inputs)?;
    Ok(Command {
        public_inputs,
        proof,
        params,
    })
}

/// Parse the `index`-th placeholder of `inputs.masked_command` as `kind`.
pub(crate) fn masked_param(
    template: &CommandTemplate,
    inputs: &PublicInputSet,
    index: usize,
    kind: ParamKind,
) -> Result<TemplateValue, ClaimError> {
    let token = extract_param(template, &inputs.masked_command, index).ok_or_else(|| {
        ClaimError::Format(format!("masked command has no parameter {index}"))
    })?;
    TemplateValue::parse(kind, token).map_err(|e| ClaimError::Format(e.to_string()))
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}
