//! # Field Elements
//!
//! A [`FieldElement`] is a 256-bit big-endian integer. It is *canonical*
//! when strictly below the BN254 scalar modulus `r`; only canonical elements
//! may appear on the proof wire. Construction does not reduce or reject, so
//! callers can hold attacker-supplied values and range-check them explicitly
//! with [`FieldElement::is_canonical`].
//!
//! Textual form is `0x`-prefixed hex; decimal strings (the form circuit
//! tooling usually emits) are accepted on input.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;
use crate::identity::strip_hex_prefix;

/// BN254 scalar field modulus, big-endian:
/// `21888242871839275222246405745257275088548364400416034343698204186575808495617`.
pub const SCALAR_FIELD_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

fn scalar_modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| BigUint::from_bytes_be(&SCALAR_FIELD_MODULUS))
}

/// A 256-bit value destined for (or read from) the circuit's public-input wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// Zero.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Wrap big-endian bytes without range checking.
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Embed a `u64`.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Embed a `u128`.
    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Big-endian bytes.
    pub fn as_be_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether the value is strictly below the scalar modulus.
    pub fn is_canonical(&self) -> bool {
        self.to_biguint() < *scalar_modulus()
    }

    /// The value as an unbounded integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// Embed an integer of at most 256 bits.
    pub fn from_biguint(value: &BigUint) -> Result<Self, ParseError> {
        if value.bits() > 256 {
            return Err(ParseError::Overflow);
        }
        let be = value.to_bytes_be();
        let mut bytes = [0u8; 32];
        bytes[32 - be.len()..].copy_from_slice(&be);
        Ok(Self(bytes))
    }

    /// Render as an unsigned decimal string.
    pub fn to_decimal(&self) -> String {
        self.to_biguint().to_string()
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Whether the value fits in the low `n` bytes.
    pub fn fits_in_bytes(&self, n: usize) -> bool {
        n >= 32 || self.0[..32 - n].iter().all(|b| *b == 0)
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        if !self.fits_in_bytes(8) {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(buf))
    }

    /// The value as a `u128`, if it fits.
    pub fn to_u128(&self) -> Option<u128> {
        if !self.fits_in_bytes(16) {
            return None;
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(buf))
    }

    /// Render as `0x` followed by 64 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse `0x`-prefixed hex of up to 64 digits.
    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        let digits = strip_hex_prefix(s.trim());
        if digits.is_empty() {
            return Err(ParseError::Empty);
        }
        if digits.len() > 64 {
            return Err(ParseError::Overflow);
        }
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(padded, &mut bytes)
            .map_err(|e| ParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Parse an unsigned decimal string.
    pub fn from_decimal(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(ParseError::InvalidDigit(c));
        }
        let value = s
            .parse::<BigUint>()
            .map_err(|e| ParseError::InvalidDecimal(e.to_string()))?;
        Self::from_biguint(&value)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for FieldElement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.starts_with("0x") || t.starts_with("0X") {
            Self::from_hex(t)
        } else {
            Self::from_decimal(t)
        }
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
