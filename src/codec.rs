//! Byte encoding of typed values written under ERC725Y keys.
//!
//! The layout is compact: scalars take their natural width (`uint32` is four
//! bytes, `address` twenty), `string` and `bytes` are stored raw without a
//! length prefix, and tuples are the concatenation of their members. Only
//! arrays fall back to 32-byte words: a word holding the element count is
//! followed by one word-encoded entry per element.
//!
//! Decoding is the exact inverse and rejects any byte sequence that a
//! well-formed encoder could not have produced.
//!
//! # Example
//!
//! ```
//! use lsp2_schema::codec::{decode_value, encode_value, DecodedValue};
//! use lsp2_schema::valuetype::ValueType;
//! use hex_literal::hex;
//!
//! let ty: ValueType = "(bytes4,uint128)".parse().unwrap();
//! let value = DecodedValue::Tuple(vec![
//!     DecodedValue::FixedBytes(hex!("cafecafe").to_vec()),
//!     DecodedValue::from(5u64),
//! ]);
//! let bytes = encode_value(&ty, &value).unwrap();
//! assert_eq!(bytes.len(), 20);
//! assert_eq!(decode_value(&ty, &bytes).unwrap(), value);
//! ```

#[cfg(feature = "proptest")]
pub mod strategy;

use core::fmt;

use ethnum::{I256, U256};

use crate::align::{left_align, right_align, Alignment};
use crate::valuetype::{ValueType, ADDRESS_LEN, WORD_LEN};

/// A decoded value, shaped like the [ValueType] it was decoded with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodedValue {
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Address([u8; ADDRESS_LEN]),
    Uint(U256),
    Int(I256),
    FixedBytes(Vec<u8>),
    Tuple(Vec<DecodedValue>),
    Array(Vec<DecodedValue>),
}

/// Bytes that cannot have been produced by encoding a value of the given type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedValue {
    /// A fixed-width type received the wrong number of bytes.
    WidthMismatch {
        ty: ValueType,
        expected: usize,
        found: usize,
    },
    /// The input ended before the type was fully read.
    Truncated { ty: ValueType, needed: usize, remaining: usize },
    /// Bytes were left over after the type was fully read.
    TrailingBytes { ty: ValueType, count: usize },
    /// An array declares more elements than the remaining bytes can hold.
    ArrayTooLong { count: U256, remaining: usize },
    /// A 32-byte word carried non-zero padding or an out-of-range number.
    BadPadding { ty: ValueType },
    /// A `bool` byte other than `0x00` or `0x01`.
    InvalidBool(u8),
    /// A `string` that is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for MalformedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidthMismatch {
                ty,
                expected,
                found,
            } => write!(f, "{ty} needs {expected} bytes, found {found}"),
            Self::Truncated {
                ty,
                needed,
                remaining,
            } => write!(f, "{ty} needs {needed} more bytes, only {remaining} remain"),
            Self::TrailingBytes { ty, count } => {
                write!(f, "{count} trailing bytes after {ty}")
            }
            Self::ArrayTooLong { count, remaining } => write!(
                f,
                "array declares {count} elements but only {remaining} bytes remain"
            ),
            Self::BadPadding { ty } => write!(f, "malformed 32-byte word for {ty}"),
            Self::InvalidBool(byte) => write!(f, "invalid bool byte 0x{byte:02x}"),
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
        }
    }
}

impl std::error::Error for MalformedValue {}

/// A native value that cannot be encoded as the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value has a different shape than the type.
    TypeMismatch { ty: ValueType, found: &'static str },
    /// The value does not fit into the type's width.
    OutOfRange { ty: ValueType },
    /// A tuple value has a different number of members than its type.
    TupleArity { ty: ValueType, found: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { ty, found } => {
                write!(f, "cannot encode a {found} value as {ty}")
            }
            Self::OutOfRange { ty } => write!(f, "value does not fit into {ty}"),
            Self::TupleArity { ty, found } => {
                write!(f, "tuple {ty} cannot hold {found} members")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

impl DecodedValue {
    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Bool(_) => "bool",
            DecodedValue::String(_) => "string",
            DecodedValue::Bytes(_) => "bytes",
            DecodedValue::Address(_) => "address",
            DecodedValue::Uint(_) => "uint",
            DecodedValue::Int(_) => "int",
            DecodedValue::FixedBytes(_) => "fixed bytes",
            DecodedValue::Tuple(_) => "tuple",
            DecodedValue::Array(_) => "array",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The raw bytes of `bytes` and `bytesN` values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::Bytes(b) | DecodedValue::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&[u8; ADDRESS_LEN]> {
        match self {
            DecodedValue::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            DecodedValue::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<I256> {
        match self {
            DecodedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Members of a tuple or elements of an array.
    pub fn as_slice(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Tuple(items) | DecodedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// A JSON rendering for display: byte strings become `0x` hex and
    /// numbers become decimal strings so 256-bit values survive.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            DecodedValue::Bool(b) => Json::Bool(*b),
            DecodedValue::String(s) => Json::String(s.clone()),
            DecodedValue::Bytes(b) | DecodedValue::FixedBytes(b) => {
                Json::String(format!("0x{}", hex::encode(b)))
            }
            DecodedValue::Address(a) => Json::String(format!("0x{}", hex::encode(a))),
            DecodedValue::Uint(u) => Json::String(u.to_string()),
            DecodedValue::Int(i) => Json::String(i.to_string()),
            DecodedValue::Tuple(items) | DecodedValue::Array(items) => {
                Json::Array(items.iter().map(DecodedValue::to_json).collect())
            }
        }
    }
}

impl From<bool> for DecodedValue {
    fn from(b: bool) -> Self {
        DecodedValue::Bool(b)
    }
}

impl From<&str> for DecodedValue {
    fn from(s: &str) -> Self {
        DecodedValue::String(s.to_owned())
    }
}

impl From<String> for DecodedValue {
    fn from(s: String) -> Self {
        DecodedValue::String(s)
    }
}

impl From<[u8; ADDRESS_LEN]> for DecodedValue {
    fn from(a: [u8; ADDRESS_LEN]) -> Self {
        DecodedValue::Address(a)
    }
}

impl From<U256> for DecodedValue {
    fn from(u: U256) -> Self {
        DecodedValue::Uint(u)
    }
}

impl From<I256> for DecodedValue {
    fn from(i: I256) -> Self {
        DecodedValue::Int(i)
    }
}

impl From<u64> for DecodedValue {
    fn from(u: u64) -> Self {
        DecodedValue::Uint(U256::from(u))
    }
}

impl From<u128> for DecodedValue {
    fn from(u: u128) -> Self {
        DecodedValue::Uint(U256::new(u))
    }
}

impl From<i64> for DecodedValue {
    fn from(i: i64) -> Self {
        DecodedValue::Int(I256::from(i))
    }
}

fn uint_fits(value: U256, bits: u16) -> bool {
    bits >= 256 || value >> u32::from(bits) == U256::ZERO
}

fn int_fits(value: I256, bits: u16) -> bool {
    if bits >= 256 {
        return true;
    }
    let shifted = value >> u32::from(bits - 1);
    shifted == I256::ZERO || shifted == I256::MINUS_ONE
}

fn mismatch(ty: &ValueType, value: &DecodedValue) -> EncodeError {
    EncodeError::TypeMismatch {
        ty: ty.clone(),
        found: value.kind(),
    }
}

/// Encodes a scalar into its natural width.
fn encode_scalar(ty: &ValueType, value: &DecodedValue) -> Result<Vec<u8>, EncodeError> {
    match (ty, value) {
        (ValueType::Bool, DecodedValue::Bool(b)) => Ok(vec![u8::from(*b)]),
        (ValueType::Address, DecodedValue::Address(a)) => Ok(a.to_vec()),
        (ValueType::Uint(bits), DecodedValue::Uint(u)) => {
            if !uint_fits(*u, *bits) {
                return Err(EncodeError::OutOfRange { ty: ty.clone() });
            }
            Ok(left_align(&u.to_be_bytes(), *bits as usize / 8))
        }
        (ValueType::Int(bits), DecodedValue::Int(i)) => {
            if !int_fits(*i, *bits) {
                return Err(EncodeError::OutOfRange { ty: ty.clone() });
            }
            Ok(left_align(&i.to_be_bytes(), *bits as usize / 8))
        }
        (ValueType::FixedBytes(len), DecodedValue::FixedBytes(b) | DecodedValue::Bytes(b)) => {
            if b.len() > *len as usize {
                return Err(EncodeError::OutOfRange { ty: ty.clone() });
            }
            Ok(right_align(b, *len as usize))
        }
        _ => Err(mismatch(ty, value)),
    }
}

/// Encodes `value` as `ty` in the compact layout.
pub fn encode_value(ty: &ValueType, value: &DecodedValue) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    encode_into(ty, value, &mut out)?;
    Ok(out)
}

fn encode_into(ty: &ValueType, value: &DecodedValue, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match (ty, value) {
        (ValueType::String, DecodedValue::String(s)) => out.extend_from_slice(s.as_bytes()),
        (ValueType::Bytes, DecodedValue::Bytes(b) | DecodedValue::FixedBytes(b)) => {
            out.extend_from_slice(b)
        }
        (ValueType::Tuple(members), DecodedValue::Tuple(items)) => {
            if members.len() != items.len() {
                return Err(EncodeError::TupleArity {
                    ty: ty.clone(),
                    found: items.len(),
                });
            }
            for (member, item) in members.iter().zip(items) {
                encode_into(member, item, out)?;
            }
        }
        (ValueType::Array(element), DecodedValue::Array(items)) => {
            out.extend_from_slice(&U256::from(items.len() as u64).to_be_bytes());
            for item in items {
                encode_word(element, item, out)?;
            }
        }
        _ if ty.is_scalar() => out.extend(encode_scalar(ty, value)?),
        _ => return Err(mismatch(ty, value)),
    }
    Ok(())
}

/// Encodes an array element as one or more 32-byte words.
fn encode_word(ty: &ValueType, value: &DecodedValue, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match (ty, value) {
        (ValueType::Int(_), DecodedValue::Int(i)) => {
            // Validate the width, then sign-extend to the whole word.
            encode_scalar(ty, value)?;
            out.extend_from_slice(&i.to_be_bytes());
        }
        (ValueType::Address, DecodedValue::Address(a)) => {
            out.extend(left_align(a, WORD_LEN));
        }
        (ValueType::String, DecodedValue::String(s)) => encode_padded(s.as_bytes(), out),
        (ValueType::Bytes, DecodedValue::Bytes(b) | DecodedValue::FixedBytes(b)) => {
            encode_padded(b, out)
        }
        (ValueType::Tuple(members), DecodedValue::Tuple(items)) => {
            if members.len() != items.len() {
                return Err(EncodeError::TupleArity {
                    ty: ty.clone(),
                    found: items.len(),
                });
            }
            for (member, item) in members.iter().zip(items) {
                encode_word(member, item, out)?;
            }
        }
        (ValueType::Array(_), _) => encode_into(ty, value, out)?,
        _ => match ty.alignment() {
            Some(alignment) => out.extend(alignment.align(&encode_scalar(ty, value)?, WORD_LEN)),
            None => return Err(mismatch(ty, value)),
        },
    }
    Ok(())
}

/// A length word followed by the data right-padded to whole words.
fn encode_padded(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&U256::from(data.len() as u64).to_be_bytes());
    out.extend_from_slice(data);
    let rem = data.len() % WORD_LEN;
    if rem != 0 {
        out.extend(std::iter::repeat(0u8).take(WORD_LEN - rem));
    }
}

/// Decodes `bytes` as a value of `ty`, consuming all of them.
pub fn decode_value(ty: &ValueType, bytes: &[u8]) -> Result<DecodedValue, MalformedValue> {
    if let Some(expected) = ty.fixed_width() {
        if bytes.len() != expected {
            return Err(MalformedValue::WidthMismatch {
                ty: ty.clone(),
                expected,
                found: bytes.len(),
            });
        }
    }
    match ty {
        ValueType::String => String::from_utf8(bytes.to_vec())
            .map(DecodedValue::String)
            .map_err(|_| MalformedValue::InvalidUtf8),
        ValueType::Bytes => Ok(DecodedValue::Bytes(bytes.to_vec())),
        ValueType::Tuple(members) => {
            let mut rest = bytes;
            let mut items = Vec::with_capacity(members.len());
            for member in members {
                match member.fixed_width() {
                    Some(width) => {
                        if rest.len() < width {
                            return Err(MalformedValue::Truncated {
                                ty: member.clone(),
                                needed: width,
                                remaining: rest.len(),
                            });
                        }
                        let (head, tail) = rest.split_at(width);
                        items.push(decode_value(member, head)?);
                        rest = tail;
                    }
                    None => {
                        items.push(decode_value(member, rest)?);
                        rest = &[];
                    }
                }
            }
            Ok(DecodedValue::Tuple(items))
        }
        ValueType::Array(_) => {
            let mut reader = WordReader::new(bytes);
            let value = reader.read(ty)?;
            reader.finish(ty)?;
            Ok(value)
        }
        _ => decode_scalar(ty, bytes),
    }
}

/// Decodes a scalar from exactly its natural width.
fn decode_scalar(ty: &ValueType, bytes: &[u8]) -> Result<DecodedValue, MalformedValue> {
    match ty {
        ValueType::Bool => match bytes {
            [0] => Ok(DecodedValue::Bool(false)),
            [1] => Ok(DecodedValue::Bool(true)),
            [b] => Err(MalformedValue::InvalidBool(*b)),
            _ => Err(MalformedValue::WidthMismatch {
                ty: ty.clone(),
                expected: 1,
                found: bytes.len(),
            }),
        },
        ValueType::Address => {
            let mut a = [0u8; ADDRESS_LEN];
            a.copy_from_slice(bytes);
            Ok(DecodedValue::Address(a))
        }
        ValueType::Uint(_) => {
            let mut word = [0u8; WORD_LEN];
            word.copy_from_slice(&left_align(bytes, WORD_LEN));
            Ok(DecodedValue::Uint(U256::from_be_bytes(word)))
        }
        ValueType::Int(_) => {
            let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
            let mut word = [if negative { 0xff } else { 0 }; WORD_LEN];
            word[WORD_LEN - bytes.len()..].copy_from_slice(bytes);
            Ok(DecodedValue::Int(I256::from_be_bytes(word)))
        }
        ValueType::FixedBytes(_) => Ok(DecodedValue::FixedBytes(bytes.to_vec())),
        _ => unreachable!("decode_scalar called with composite type {ty}"),
    }
}

/// Sequential reader over the 32-byte words of an array encoding.
struct WordReader<'a> {
    bytes: &'a [u8],
}

impl<'a> WordReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        WordReader { bytes }
    }

    fn take(&mut self, ty: &ValueType, n: usize) -> Result<&'a [u8], MalformedValue> {
        if self.bytes.len() < n {
            return Err(MalformedValue::Truncated {
                ty: ty.clone(),
                needed: n,
                remaining: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    fn word(&mut self, ty: &ValueType) -> Result<[u8; WORD_LEN], MalformedValue> {
        let mut word = [0u8; WORD_LEN];
        word.copy_from_slice(self.take(ty, WORD_LEN)?);
        Ok(word)
    }

    /// Reads a length or count word and checks it against what is left.
    fn length(&mut self, ty: &ValueType, unit: usize) -> Result<usize, MalformedValue> {
        let count = U256::from_be_bytes(self.word(ty)?);
        let remaining = self.bytes.len();
        let fits = count
            .checked_mul(U256::from(unit as u64))
            .is_some_and(|needed| needed <= U256::from(remaining as u64));
        if !fits {
            return Err(MalformedValue::ArrayTooLong { count, remaining });
        }
        usize::try_from(count).map_err(|_| MalformedValue::ArrayTooLong { count, remaining })
    }

    fn read(&mut self, ty: &ValueType) -> Result<DecodedValue, MalformedValue> {
        match ty {
            ValueType::Array(element) => {
                let count = self.length(ty, element.min_words() * WORD_LEN)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.read(element)?);
                }
                Ok(DecodedValue::Array(items))
            }
            ValueType::Tuple(members) => {
                let mut items = Vec::with_capacity(members.len());
                for member in members {
                    items.push(self.read(member)?);
                }
                Ok(DecodedValue::Tuple(items))
            }
            ValueType::String | ValueType::Bytes => {
                let len = self.length(ty, 1)?;
                let padded = len.div_ceil(WORD_LEN) * WORD_LEN;
                let chunk = self.take(ty, padded)?;
                let data = Alignment::Right
                    .unpad(chunk, len)
                    .ok_or_else(|| MalformedValue::BadPadding { ty: ty.clone() })?;
                decode_value(ty, data)
            }
            ValueType::Int(bits) => {
                let value = I256::from_be_bytes(self.word(ty)?);
                if !int_fits(value, *bits) {
                    return Err(MalformedValue::BadPadding { ty: ty.clone() });
                }
                Ok(DecodedValue::Int(value))
            }
            ValueType::Address => {
                let word = self.word(ty)?;
                let natural = Alignment::Left
                    .unpad(&word, ADDRESS_LEN)
                    .ok_or_else(|| MalformedValue::BadPadding { ty: ty.clone() })?;
                decode_scalar(ty, natural)
            }
            _ => {
                let word = self.word(ty)?;
                // Only scalars reach this arm, and every scalar has both.
                let (alignment, width) = match (ty.alignment(), ty.fixed_width()) {
                    (Some(alignment), Some(width)) => (alignment, width),
                    _ => return Err(MalformedValue::BadPadding { ty: ty.clone() }),
                };
                let natural = alignment
                    .unpad(&word, width)
                    .ok_or_else(|| MalformedValue::BadPadding { ty: ty.clone() })?;
                decode_scalar(ty, natural)
            }
        }
    }

    fn finish(&self, ty: &ValueType) -> Result<(), MalformedValue> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(MalformedValue::TrailingBytes {
                ty: ty.clone(),
                count: self.bytes.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn ty(token: &str) -> ValueType {
        token.parse().expect("valid type token")
    }

    fn roundtrip(token: &str, value: DecodedValue) -> Vec<u8> {
        let ty = ty(token);
        let bytes = encode_value(&ty, &value).expect("value should encode");
        assert_eq!(decode_value(&ty, &bytes), Ok(value));
        bytes
    }

    #[test]
    fn fixed_widths() {
        assert_eq!(roundtrip("uint32", 7u64.into()), hex!("00000007"));
        assert_eq!(roundtrip("address", [0x11u8; 20].into()).len(), 20);
        assert_eq!(
            encode_value(&ty("bytes4"), &DecodedValue::FixedBytes(vec![0xca, 0xfe])),
            Ok(hex!("cafe0000").to_vec())
        );
        assert_eq!(roundtrip("uint256", U256::MAX.into()), [0xff; 32]);
    }

    #[test]
    fn bool_is_one_byte() {
        assert_eq!(roundtrip("bool", true.into()), [1]);
        assert_eq!(roundtrip("bool", false.into()), [0]);
        assert_eq!(
            decode_value(&ty("bool"), &[]),
            Err(MalformedValue::WidthMismatch {
                ty: ValueType::Bool,
                expected: 1,
                found: 0
            })
        );
        assert_eq!(
            decode_value(&ty("bool"), &[2]),
            Err(MalformedValue::InvalidBool(2))
        );
    }

    #[test]
    fn strings_and_bytes_are_raw() {
        assert_eq!(roundtrip("string", "Alice".into()), b"Alice");
        assert_eq!(roundtrip("string", "".into()), b"");
        assert_eq!(
            roundtrip("bytes", DecodedValue::Bytes(vec![1, 2, 3])),
            [1, 2, 3]
        );
        assert_eq!(
            decode_value(&ty("string"), &[0xff, 0xfe]),
            Err(MalformedValue::InvalidUtf8)
        );
    }

    #[test]
    fn signed_integers() {
        assert_eq!(roundtrip("int8", (-1i64).into()), [0xff]);
        assert_eq!(roundtrip("int16", (-2i64).into()), [0xff, 0xfe]);
        assert_eq!(roundtrip("int16", 300i64.into()), [0x01, 0x2c]);
        assert_eq!(
            encode_value(&ty("int8"), &128i64.into()),
            Err(EncodeError::OutOfRange { ty: ValueType::Int(8) })
        );
        assert_eq!(
            encode_value(&ty("int8"), &(-129i64).into()),
            Err(EncodeError::OutOfRange { ty: ValueType::Int(8) })
        );
    }

    #[test]
    fn rejects_out_of_range_and_mismatched_values() {
        assert_eq!(
            encode_value(&ty("uint8"), &256u64.into()),
            Err(EncodeError::OutOfRange { ty: ValueType::Uint(8) })
        );
        assert_eq!(
            encode_value(&ty("bytes2"), &DecodedValue::FixedBytes(vec![1, 2, 3])),
            Err(EncodeError::OutOfRange {
                ty: ValueType::FixedBytes(2)
            })
        );
        assert_eq!(
            encode_value(&ty("address"), &"nope".into()),
            Err(EncodeError::TypeMismatch {
                ty: ValueType::Address,
                found: "string"
            })
        );
        assert!(matches!(
            encode_value(&ty("(bool,bool)"), &DecodedValue::Tuple(vec![true.into()])),
            Err(EncodeError::TupleArity { found: 1, .. })
        ));
    }

    #[test]
    fn tuple_concatenates_members() {
        let bytes = roundtrip(
            "(bytes4,uint128)",
            DecodedValue::Tuple(vec![
                DecodedValue::FixedBytes(hex!("cafecafe").to_vec()),
                5u64.into(),
            ]),
        );
        assert_eq!(
            bytes,
            hex!("cafecafe00000000000000000000000000000005").to_vec()
        );
    }

    #[test]
    fn tuple_with_trailing_bytes_member() {
        let bytes = roundtrip(
            "(bytes4,bytes)",
            DecodedValue::Tuple(vec![
                DecodedValue::FixedBytes(hex!("6f357c6a").to_vec()),
                DecodedValue::Bytes(b"ipfs://x".to_vec()),
            ]),
        );
        assert_eq!(&bytes[..4], hex!("6f357c6a"));
        assert!(matches!(
            decode_value(&ty("(bytes4,bytes)"), &[1, 2]),
            Err(MalformedValue::Truncated { needed: 4, .. })
        ));
    }

    #[test]
    fn arrays_use_words() {
        let bytes = roundtrip(
            "uint8[]",
            DecodedValue::Array(vec![1u64.into(), 2u64.into()]),
        );
        assert_eq!(bytes.len(), 96);
        assert_eq!(bytes[31], 2);
        assert_eq!(bytes[63], 1);
        assert_eq!(bytes[95], 2);

        let addresses = roundtrip(
            "address[]",
            DecodedValue::Array(vec![[0xaau8; 20].into()]),
        );
        assert_eq!(addresses[32..44], [0; 12]);
        assert_eq!(addresses[44..64], [0xaa; 20]);

        let fixed = roundtrip(
            "bytes4[]",
            DecodedValue::Array(vec![DecodedValue::FixedBytes(hex!("cafecafe").to_vec())]),
        );
        assert_eq!(fixed[32..36], hex!("cafecafe"));
        assert_eq!(fixed[36..64], [0; 28]);

        let signed = roundtrip("int8[]", DecodedValue::Array(vec![(-1i64).into()]));
        assert_eq!(signed[32..64], [0xff; 32]);
    }

    #[test]
    fn empty_array_is_one_word() {
        assert_eq!(roundtrip("string[]", DecodedValue::Array(vec![])), [0; 32]);
    }

    #[test]
    fn array_of_strings_is_length_prefixed() {
        let bytes = roundtrip(
            "string[]",
            DecodedValue::Array(vec!["design".into(), "".into(), "x".repeat(33).into()]),
        );
        // count, ("design": len + 1 word), ("": len), (33 bytes: len + 2 words)
        assert_eq!(bytes.len(), 32 * (1 + 2 + 1 + 3));
    }

    #[test]
    fn nested_composites() {
        roundtrip(
            "(address,uint16)[]",
            DecodedValue::Array(vec![
                DecodedValue::Tuple(vec![[1u8; 20].into(), 10u64.into()]),
                DecodedValue::Tuple(vec![[2u8; 20].into(), 20u64.into()]),
            ]),
        );
        roundtrip(
            "uint8[][]",
            DecodedValue::Array(vec![
                DecodedValue::Array(vec![1u64.into()]),
                DecodedValue::Array(vec![]),
            ]),
        );
        roundtrip(
            "(bytes4,string[])",
            DecodedValue::Tuple(vec![
                DecodedValue::FixedBytes(vec![1, 2, 3, 4]),
                DecodedValue::Array(vec!["a".into()]),
            ]),
        );
    }

    #[test]
    fn rejects_array_count_past_end() {
        let mut bytes = vec![0u8; 64];
        bytes[31] = 2;
        assert_eq!(
            decode_value(&ty("uint8[]"), &bytes),
            Err(MalformedValue::ArrayTooLong {
                count: U256::new(2),
                remaining: 32
            })
        );
        let huge = [0xff; 32];
        assert!(matches!(
            decode_value(&ty("bool[]"), &huge),
            Err(MalformedValue::ArrayTooLong { .. })
        ));
    }

    #[test]
    fn rejects_dirty_words_and_trailing_bytes() {
        let mut bytes = vec![0u8; 64];
        bytes[31] = 1;
        bytes[32] = 1;
        bytes[63] = 1;
        assert_eq!(
            decode_value(&ty("uint8[]"), &bytes),
            Err(MalformedValue::BadPadding {
                ty: ValueType::Uint(8)
            })
        );

        let bytes = vec![0u8; 33];
        assert!(matches!(
            decode_value(&ty("uint8[]"), &bytes),
            Err(MalformedValue::TrailingBytes { count: 1, .. })
        ));
    }

    #[test]
    fn wrong_width_is_malformed() {
        assert!(matches!(
            decode_value(&ty("uint32"), &[0, 0, 1]),
            Err(MalformedValue::WidthMismatch {
                expected: 4,
                found: 3,
                ..
            })
        ));
        assert!(matches!(
            decode_value(&ty("(bytes4,uint128)"), &[0; 21]),
            Err(MalformedValue::WidthMismatch { expected: 20, .. })
        ));
    }

    #[test]
    fn json_rendering() {
        let value = DecodedValue::Tuple(vec![
            DecodedValue::FixedBytes(hex!("cafecafe").to_vec()),
            5u64.into(),
            (-3i64).into(),
        ]);
        assert_eq!(
            value.to_json(),
            serde_json::json!(["0xcafecafe", "5", "-3"])
        );
    }
}
