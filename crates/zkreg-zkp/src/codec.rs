//! # Field Codec
//!
//! Bidirectional mapping between typed values and fixed-layout sequences of
//! field elements. Every element produced here is canonical.
//!
//! ## Encodings
//!
//! - **Fixed bytes**: `ceil(padded/31)` elements, 31 bytes per element packed
//!   least-significant-byte first, zero padded on the right. Decoding trims
//!   trailing zero bytes, so a string that genuinely ends in `0x00` does not
//!   round-trip.
//! - **Bounded vector**: `max + 1` elements, one byte per element followed by
//!   the true length.
//! - **Hash**: one element (the value must already be canonical) or two
//!   128-bit halves, high half first.
//! - **Bool / u64 / address**: one element each.
//!
//! Decoders never truncate or pad. A sequence of the wrong length is a
//! [`CodecError::LengthMismatch`].

use thiserror::Error;

use zkreg_core::{Address, FieldElement};

/// Payload bytes carried by one fixed-bytes element.
pub const BYTES_PER_FIELD: usize = 31;

/// Error packing or unpacking a field layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The sequence does not have the declared layout length.
    #[error("expected {expected} field elements, got {actual}")]
    LengthMismatch {
        /// Declared length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// The value is longer than the layout can hold.
    #[error("{len} bytes exceed capacity {capacity}")]
    CapacityExceeded {
        /// Value length in bytes.
        len: usize,
        /// Layout capacity in bytes.
        capacity: usize,
    },

    /// An element is too wide for its encoding (or not canonical).
    #[error("element {index} is out of range for its encoding")]
    ElementOutOfRange {
        /// Index within the decoded slice.
        index: usize,
    },

    /// A bounded vector declares more bytes than it has room for.
    #[error("declared length exceeds capacity {capacity}")]
    DeclaredLengthTooLarge {
        /// Capacity of the vector.
        capacity: usize,
    },

    /// Padding past the payload is non-zero.
    #[error("non-zero padding at element {index}")]
    NonZeroPadding {
        /// Index within the decoded slice.
        index: usize,
    },

    /// A string field is not valid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,
}

/// Number of elements a fixed-bytes field of `padded_size` occupies.
pub const fn fields_for_bytes(padded_size: usize) -> usize {
    (padded_size + BYTES_PER_FIELD - 1) / BYTES_PER_FIELD
}

/// Pack `bytes` into `ceil(padded_size/31)` elements.
pub fn pack_fixed_bytes(bytes: &[u8], padded_size: usize) -> Result<Vec<FieldElement>, CodecError> {
    if bytes.len() > padded_size {
        return Err(CodecError::CapacityExceeded {
            len: bytes.len(),
            capacity: padded_size,
        });
    }
    let count = fields_for_bytes(padded_size);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let mut word = [0u8; 32];
        for j in 0..BYTES_PER_FIELD {
            if let Some(b) = bytes.get(i * BYTES_PER_FIELD + j) {
                word[31 - j] = *b;
            }
        }
        out.push(FieldElement::from_be_bytes(word));
    }
    Ok(out)
}

/// Reverse [`pack_fixed_bytes`] and trim trailing zero bytes.
///
/// `count` is the declared element count and must agree with both
/// `fields.len()` and `padded_size`.
pub fn unpack_fixed_bytes(
    fields: &[FieldElement],
    count: usize,
    padded_size: usize,
) -> Result<Vec<u8>, CodecError> {
    let layout = fields_for_bytes(padded_size);
    if count != layout {
        return Err(CodecError::LengthMismatch {
            expected: layout,
            actual: count,
        });
    }
    if fields.len() != count {
        return Err(CodecError::LengthMismatch {
            expected: count,
            actual: fields.len(),
        });
    }

    let mut out = Vec::with_capacity(padded_size);
    for (i, fe) in fields.iter().enumerate() {
        if !fe.fits_in_bytes(BYTES_PER_FIELD) {
            return Err(CodecError::ElementOutOfRange { index: i });
        }
        let word = fe.as_be_bytes();
        for j in 0..BYTES_PER_FIELD {
            let b = word[31 - j];
            if i * BYTES_PER_FIELD + j < padded_size {
                out.push(b);
            } else if b != 0 {
                return Err(CodecError::NonZeroPadding { index: i });
            }
        }
    }

    while out.last() == Some(&0) {
        out.pop();
    }
    Ok(out)
}

/// Pack up to `max_count` bytes, one per element, followed by the length.
pub fn pack_bounded_vec(bytes: &[u8], max_count: usize) -> Result<Vec<FieldElement>, CodecError> {
    if bytes.len() > max_count {
        return Err(CodecError::CapacityExceeded {
            len: bytes.len(),
            capacity: max_count,
        });
    }
    let mut out = Vec::with_capacity(max_count + 1);
    for i in 0..max_count {
        let b = bytes.get(i).copied().unwrap_or(0);
        out.push(FieldElement::from_u64(u64::from(b)));
    }
    out.push(FieldElement::from_u64(bytes.len() as u64));
    Ok(out)
}

/// Read the trailing length element and return exactly that many bytes.
pub fn unpack_bounded_vec(fields: &[FieldElement]) -> Result<Vec<u8>, CodecError> {
    let Some((len_fe, data)) = fields.split_last() else {
        return Err(CodecError::LengthMismatch {
            expected: 1,
            actual: 0,
        });
    };
    let capacity = data.len();
    let declared = len_fe
        .to_u64()
        .and_then(|v| usize::try_from(v).ok())
        .filter(|v| *v <= capacity)
        .ok_or(CodecError::DeclaredLengthTooLarge { capacity })?;

    let mut out = Vec::with_capacity(declared);
    for (i, fe) in data.iter().enumerate() {
        let byte = fe
            .to_u64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or(CodecError::ElementOutOfRange { index: i })?;
        if i < declared {
            out.push(byte);
        } else if byte != 0 {
            return Err(CodecError::NonZeroPadding { index: i });
        }
    }
    Ok(out)
}

/// Pack a 32-byte hash that is already a field element.
pub fn pack_hash(bytes: &[u8; 32]) -> Result<FieldElement, CodecError> {
    let fe = FieldElement::from_be_bytes(*bytes);
    if !fe.is_canonical() {
        return Err(CodecError::ElementOutOfRange { index: 0 });
    }
    Ok(fe)
}

/// Reverse [`pack_hash`].
pub fn unpack_hash(fe: &FieldElement) -> Result<[u8; 32], CodecError> {
    if !fe.is_canonical() {
        return Err(CodecError::ElementOutOfRange { index: 0 });
    }
    Ok(*fe.as_be_bytes())
}

/// Pack an arbitrary 32-byte hash as two 128-bit halves, high half first.
pub fn pack_hash_split(bytes: &[u8; 32]) -> [FieldElement; 2] {
    let mut hi = [0u8; 32];
    let mut lo = [0u8; 32];
    hi[16..].copy_from_slice(&bytes[..16]);
    lo[16..].copy_from_slice(&bytes[16..]);
    [FieldElement::from_be_bytes(hi), FieldElement::from_be_bytes(lo)]
}

/// Reverse [`pack_hash_split`].
pub fn unpack_hash_split(fields: &[FieldElement]) -> Result<[u8; 32], CodecError> {
    if fields.len() != 2 {
        return Err(CodecError::LengthMismatch {
            expected: 2,
            actual: fields.len(),
        });
    }
    let mut out = [0u8; 32];
    for (i, fe) in fields.iter().enumerate() {
        if !fe.fits_in_bytes(16) {
            return Err(CodecError::ElementOutOfRange { index: i });
        }
        out[i * 16..(i + 1) * 16].copy_from_slice(&fe.as_be_bytes()[16..]);
    }
    Ok(out)
}

/// `0` or `1`.
pub fn pack_bool(value: bool) -> FieldElement {
    FieldElement::from_u64(u64::from(value))
}

/// Reverse [`pack_bool`]; anything but 0 or 1 is rejected.
pub fn unpack_bool(fe: &FieldElement) -> Result<bool, CodecError> {
    match fe.to_u64() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(CodecError::ElementOutOfRange { index: 0 }),
    }
}

pub fn pack_u64(value: u64) -> FieldElement {
    FieldElement::from_u64(value)
}

pub fn unpack_u64(fe: &FieldElement) -> Result<u64, CodecError> {
    fe.to_u64().ok_or(CodecError::ElementOutOfRange { index: 0 })
}

/// An address occupies the low 20 bytes of one element.
pub fn pack_address(address: &Address) -> FieldElement {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    FieldElement::from_be_bytes(word)
}

/// Reverse [`pack_address`].
pub fn unpack_address(fe: &FieldElement) -> Result<Address, CodecError> {
    if !fe.fits_in_bytes(20) {
        return Err(CodecError::ElementOutOfRange { index: 0 });
    }
    Ok(Address::from_word(fe.as_be_bytes()))
}

/// Sequential cursor over a field slice, used by layout decoders.
#[derive(Debug)]
pub struct FieldReader<'a> {
    fields: &'a [FieldElement],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a [FieldElement]) -> Self {
        Self { fields, pos: 0 }
    }

    /// Take the next `n` elements.
    pub fn take(&mut self, n: usize) -> Result<&'a [FieldElement], CodecError> {
        let end = self.pos + n;
        if end > self.fields.len() {
            return Err(CodecError::LengthMismatch {
                expected: end,
                actual: self.fields.len(),
            });
        }
        let slice = &self.fields[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Take exactly one element.
    pub fn take_one(&mut self) -> Result<&'a FieldElement, CodecError> {
        Ok(&self.take(1)?[0])
    }

    /// Elements consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Fail if anything is left unread.
    pub fn finish(self) -> Result<(), CodecError> {
        if self.pos != self.fields.len() {
            return Err(CodecError::LengthMismatch {
                expected: self.pos,
                actual: self.fields.len(),
            });
        }
        Ok(())
    }
}
