//! # Public Input Layout
//!
//! The email circuit commits to 424 public inputs in a fixed order. This
//! module owns that order: [`PublicInputSet::pack`] and
//! [`PublicInputSet::unpack`] are the only places it is spelled out.

use serde::{Deserialize, Serialize};

use zkreg_core::{Address, Bytes32, FieldElement, Nullifier};

use crate::codec::{
    fields_for_bytes, pack_address, pack_bool, pack_bounded_vec, pack_fixed_bytes, pack_hash,
    pack_hash_split, pack_u64, unpack_address, unpack_bool, unpack_bounded_vec,
    unpack_fixed_bytes, unpack_hash, unpack_hash_split, unpack_u64, CodecError, FieldReader,
};

/// Padded byte width of the DKIM signing domain.
pub const DOMAIN_NAME_BYTES: usize = 255;
/// Padded byte width of the masked command.
pub const COMMAND_BYTES: usize = 605;
/// Capacity of the claimed identity vector.
pub const MAX_IDENTITY_BYTES: usize = 128;
/// Capacity of the sender domain vector.
pub const MAX_SENDER_DOMAIN_BYTES: usize = 255;

const DOMAIN_NAME_FIELDS: usize = fields_for_bytes(DOMAIN_NAME_BYTES);
const COMMAND_FIELDS: usize = fields_for_bytes(COMMAND_BYTES);

/// Total number of public inputs.
pub const PUBLIC_INPUT_COUNT: usize = DOMAIN_NAME_FIELDS
    + 1 // public_key_hash
    + 2 // header_hash
    + 1 // nullifier
    + 1 // timestamp
    + COMMAND_FIELDS
    + 1 // account_salt
    + 1 // is_code_exist
    + 2 // auxiliary_key_hash
    + (MAX_IDENTITY_BYTES + 1)
    + (MAX_SENDER_DOMAIN_BYTES + 1)
    + 1; // prover_address

/// Typed view of the circuit's public inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputSet {
    /// DKIM `d=` domain of the signed header.
    pub domain_name: String,
    /// Hash of the DKIM public key; must be a field element.
    pub public_key_hash: Bytes32,
    /// Hash of the signed header.
    pub header_hash: Bytes32,
    /// Single-use tag derived from the email signature; must be a field element.
    pub nullifier: Nullifier,
    /// Email timestamp, seconds.
    pub timestamp: u64,
    /// Subject line with private fragments masked out.
    pub masked_command: String,
    /// Account salt committed by the circuit; must be a field element.
    pub account_salt: Bytes32,
    /// Whether the account code is embedded in the email.
    pub is_code_exist: bool,
    /// Commitment to auxiliary key material.
    pub auxiliary_key_hash: Bytes32,
    /// The proven email address or handle.
    pub claimed_identity: String,
    /// Sender domain used for the DKIM lookup.
    pub sender_domain: String,
    /// Address the proof is bound to.
    pub prover_address: Address,
}

impl PublicInputSet {
    /// Encode into the canonical 424-element layout.
    pub fn pack(&self) -> Result<Vec<FieldElement>, CodecError> {
        let mut out = Vec::with_capacity(PUBLIC_INPUT_COUNT);
        out.extend(pack_fixed_bytes(self.domain_name.as_bytes(), DOMAIN_NAME_BYTES)?);
        out.push(pack_hash(self.public_key_hash.as_bytes())?);
        out.extend(pack_hash_split(self.header_hash.as_bytes()));
        out.push(pack_hash(self.nullifier.as_bytes())?);
        out.push(pack_u64(self.timestamp));
        out.extend(pack_fixed_bytes(self.masked_command.as_bytes(), COMMAND_BYTES)?);
        out.push(pack_hash(self.account_salt.as_bytes())?);
        out.push(pack_bool(self.is_code_exist));
        out.extend(pack_hash_split(self.auxiliary_key_hash.as_bytes()));
        out.extend(pack_bounded_vec(self.claimed_identity.as_bytes(), MAX_IDENTITY_BYTES)?);
        out.extend(pack_bounded_vec(self.sender_domain.as_bytes(), MAX_SENDER_DOMAIN_BYTES)?);
        out.push(pack_address(&self.prover_address));
        debug_assert_eq!(out.len(), PUBLIC_INPUT_COUNT);
        Ok(out)
    }

    /// Decode from exactly [`PUBLIC_INPUT_COUNT`] elements.
    pub fn unpack(fields: &[FieldElement]) -> Result<Self, CodecError> {
        if fields.len() != PUBLIC_INPUT_COUNT {
            return Err(CodecError::LengthMismatch {
                expected: PUBLIC_INPUT_COUNT,
                actual: fields.len(),
            });
        }
        let mut r = FieldReader::new(fields);

        let domain_name = utf8(unpack_fixed_bytes(
            r.take(DOMAIN_NAME_FIELDS)?,
            DOMAIN_NAME_FIELDS,
            DOMAIN_NAME_BYTES,
        )?)?;
        let public_key_hash = Bytes32::new(unpack_hash(r.take_one()?)?);
        let header_hash = Bytes32::new(unpack_hash_split(r.take(2)?)?);
        let nullifier = Nullifier::new(unpack_hash(r.take_one()?)?);
        let timestamp = unpack_u64(r.take_one()?)?;
        let masked_command = utf8(unpack_fixed_bytes(
            r.take(COMMAND_FIELDS)?,
            COMMAND_FIELDS,
            COMMAND_BYTES,
        )?)?;
        let account_salt = Bytes32::new(unpack_hash(r.take_one()?)?);
        let is_code_exist = unpack_bool(r.take_one()?)?;
        let auxiliary_key_hash = Bytes32::new(unpack_hash_split(r.take(2)?)?);
        let claimed_identity = utf8(unpack_bounded_vec(r.take(MAX_IDENTITY_BYTES + 1)?)?)?;
        let sender_domain = utf8(unpack_bounded_vec(r.take(MAX_SENDER_DOMAIN_BYTES + 1)?)?)?;
        let prover_address = unpack_address(r.take_one()?)?;
        r.finish()?;

        Ok(Self {
            domain_name,
            public_key_hash,
            header_hash,
            nullifier,
            timestamp,
            masked_command,
            account_salt,
            is_code_exist,
            auxiliary_key_hash,
            claimed_identity,
            sender_domain,
            prover_address,
        })
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String, CodecError> {
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PublicInputSet {
        PublicInputSet {
            domain_name: "gmail.com".into(),
            public_key_hash: Bytes32::new([0x11; 32]),
            header_hash: Bytes32::new([0xee; 32]),
            nullifier: Nullifier::new([0x22; 32]),
            timestamp: 1_700_000_000,
            masked_command: "Withdraw all eth to 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
                .into(),
            account_salt: Bytes32::new([0x03; 32]),
            is_code_exist: true,
            auxiliary_key_hash: Bytes32::new([0xfa; 32]),
            claimed_identity: "thezdev1".into(),
            sender_domain: "x.com".into(),
            prover_address: Address::new([0x44; 20]),
        }
    }

    #[test]
    fn layout_has_424_elements() {
        assert_eq!(PUBLIC_INPUT_COUNT, 424);
        assert_eq!(sample().pack().unwrap().len(), 424);
    }

    #[test]
    fn pack_unpack_roundtrip() {
        let inputs = sample();
        let fields = inputs.pack().unwrap();
        assert!(fields.iter().all(FieldElement::is_canonical));
        assert_eq!(PublicInputSet::unpack(&fields).unwrap(), inputs);
    }

    #[test]
    fn field_order_is_fixed() {
        let fields = sample().pack().unwrap();
        // timestamp follows domain (9) + key hash (1) + header (2) + nullifier (1)
        assert_eq!(fields[13].to_u64(), Some(1_700_000_000));
        // is_code_exist follows the command block (20) and the salt (1)
        assert_eq!(fields[35].to_u64(), Some(1));
        // claimed identity length sits at the end of its 129-element block
        assert_eq!(fields[38 + 128].to_u64(), Some(8));
        // sender domain length
        assert_eq!(fields[38 + 129 + 255].to_u64(), Some(5));
    }

    #[test]
    fn unpack_rejects_wrong_length() {
        let mut fields = sample().pack().unwrap();
        fields.push(FieldElement::ZERO);
        assert_eq!(
            PublicInputSet::unpack(&fields),
            Err(CodecError::LengthMismatch {
                expected: 424,
                actual: 425
            })
        );
        fields.truncate(100);
        assert!(matches!(
            PublicInputSet::unpack(&fields),
            Err(CodecError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn unpack_rejects_invalid_utf8() {
        let mut fields = sample().pack().unwrap();
        // first claimed_identity byte
        fields[38] = FieldElement::from_u64(0xff);
        assert_eq!(PublicInputSet::unpack(&fields), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn pack_rejects_non_canonical_nullifier() {
        let mut inputs = sample();
        inputs.nullifier = Nullifier::new([0xff; 32]);
        assert!(inputs.pack().is_err());
    }

    #[test]
    fn pack_rejects_oversized_identity() {
        let mut inputs = sample();
        inputs.claimed_identity = "a".repeat(129);
        assert_eq!(
            inputs.pack(),
            Err(CodecError::CapacityExceeded {
                len: 129,
                capacity: 128
            })
        );
    }
}
