//! ERC725Y JSON schemas and the storage keys derived from them.
//!
//! A schema names a piece of data (`LSP3Profile`,
//! `LSP5ReceivedAssetsMap:<address>`, ...) and declares how its 32-byte
//! storage key is built from that name:
//!
//! | key type              | layout                                                        |
//! |-----------------------|---------------------------------------------------------------|
//! | `Singleton`           | `keccak256(name)`                                             |
//! | `Array`               | `keccak256(name)`, elements at `key[..16] ++ uint128(index)`  |
//! | `Mapping`             | `keccak256(first)[..10] ++ 0000 ++ part(second)[..20]`        |
//! | `MappingWithGrouping` | `keccak256(first)[..6] ++ part(second)[..4] ++ 0000 ++ part(third)[..20]` |
//!
//! A part is either a plain word, which contributes the leading bytes of its
//! keccak-256 hash, or a `<type>` placeholder filled in with a
//! [DynamicParam] when the key is derived.
//!
//! # Example
//!
//! ```
//! use lsp2_schema::schema::{KeyType, SchemaEntry};
//!
//! let schema = SchemaEntry::new(
//!     "SupportedStandards:LSP3Profile",
//!     KeyType::Mapping,
//!     "bytes4",
//!     "0x5ef83ad9",
//! )
//! .unwrap();
//! assert_eq!(
//!     schema.derive_key(&[]).unwrap().to_string(),
//!     "0xeafec4d89fa9619884b600005ef83ad9559033e6e941db7d7c495acdce616347"
//! );
//! ```

pub mod registry;

use core::fmt;
use std::str::FromStr;

use ethnum::{I256, U256};
use hex::FromHex;

use crate::codec::{self, DecodedValue, EncodeError};
use crate::hash::keccak256;
use crate::key::{RawKey, StorageKey, KEY_LEN};
use crate::valuetype::{UnsupportedValueType, ValueType, ADDRESS_LEN};

/// Width of the hashed first word of a `Mapping` key.
const MAPPING_FIRST_LEN: usize = 10;
/// Width of the hashed first word of a `MappingWithGrouping` key.
const GROUP_FIRST_LEN: usize = 6;
/// Width of the second part of a `MappingWithGrouping` key.
const GROUP_SECOND_LEN: usize = 4;
/// Width of the trailing part of both mapping layouts.
const MAPPING_LAST_LEN: usize = 20;
/// The two zero bytes separating the hashed prefix from the last part.
const SEPARATOR_LEN: usize = 2;

/// How a schema's storage key is derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Singleton,
    Array,
    Mapping,
    MappingWithGrouping,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Singleton => "Singleton",
            KeyType::Array => "Array",
            KeyType::Mapping => "Mapping",
            KeyType::MappingWithGrouping => "MappingWithGrouping",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Singleton" => Ok(KeyType::Singleton),
            "Array" => Ok(KeyType::Array),
            "Mapping" => Ok(KeyType::Mapping),
            "MappingWithGrouping" => Ok(KeyType::MappingWithGrouping),
            other => Err(SchemaError::UnknownKeyType(other.to_owned())),
        }
    }
}

/// A schema declaration that cannot be turned into a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// `keyType` is not one of the four supported layouts.
    UnknownKeyType(String),
    /// The name does not have the shape its key type requires.
    InvalidName {
        name: String,
        key_type: KeyType,
        reason: &'static str,
    },
    /// The `valueType` or a `<type>` placeholder is not supported.
    UnsupportedValueType(UnsupportedValueType),
    /// A schema file lists a key that differs from the one derived from the name.
    KeyMismatch {
        name: String,
        expected: String,
        found: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKeyType(key_type) => write!(f, "unknown key type {key_type:?}"),
            Self::InvalidName {
                name,
                key_type,
                reason,
            } => write!(f, "invalid {key_type} name {name:?}: {reason}"),
            Self::UnsupportedValueType(err) => write!(f, "{err}"),
            Self::KeyMismatch {
                name,
                expected,
                found,
            } => write!(f, "schema {name:?} declares key {found}, expected {expected}"),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedValueType(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UnsupportedValueType> for SchemaError {
    fn from(err: UnsupportedValueType) -> Self {
        SchemaError::UnsupportedValueType(err)
    }
}

/// A dynamic parameter that does not fit the placeholder it was supplied for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidDynamicParameter {
    /// The schema has a different number of placeholders.
    Count { expected: usize, found: usize },
    /// The parameter is of a different kind than the placeholder type.
    WrongKind { ty: ValueType, found: &'static str },
    /// The parameter is wider than its placeholder type.
    TooWide { ty: ValueType },
    /// The textual parameter could not be read as the placeholder type.
    Unparsable { ty: ValueType, input: String },
}

impl fmt::Display for InvalidDynamicParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count { expected, found } => {
                write!(f, "expected {expected} dynamic parameters, got {found}")
            }
            Self::WrongKind { ty, found } => {
                write!(f, "a {found} parameter cannot fill a <{ty}> placeholder")
            }
            Self::TooWide { ty } => write!(f, "parameter does not fit into <{ty}>"),
            Self::Unparsable { ty, input } => {
                write!(f, "cannot read {input:?} as <{ty}>")
            }
        }
    }
}

impl std::error::Error for InvalidDynamicParameter {}

/// A runtime value substituted for a `<type>` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DynamicParam {
    Address([u8; ADDRESS_LEN]),
    /// Raw bytes for `bytesN` placeholders.
    Bytes(Vec<u8>),
    Uint(U256),
    Int(I256),
    Bool(bool),
    /// A word for `<string>` placeholders, hashed like a static word.
    Word(String),
}

impl DynamicParam {
    pub fn kind(&self) -> &'static str {
        match self {
            DynamicParam::Address(_) => "address",
            DynamicParam::Bytes(_) => "bytes",
            DynamicParam::Uint(_) => "uint",
            DynamicParam::Int(_) => "int",
            DynamicParam::Bool(_) => "bool",
            DynamicParam::Word(_) => "word",
        }
    }

    /// Reads a parameter from text the way it would be typed by a user:
    /// `0x` hex for addresses and byte strings, decimal (or `0x` hex) for
    /// unsigned numbers, decimal for signed numbers, `true`/`false`.
    pub fn parse(ty: &ValueType, input: &str) -> Result<Self, InvalidDynamicParameter> {
        let unparsable = || InvalidDynamicParameter::Unparsable {
            ty: ty.clone(),
            input: input.to_owned(),
        };
        let trimmed = input.trim();
        let hex_digits = trimmed.strip_prefix("0x");
        match ty {
            ValueType::Address => {
                let raw = <[u8; ADDRESS_LEN]>::from_hex(hex_digits.unwrap_or(trimmed))
                    .map_err(|_| unparsable())?;
                Ok(DynamicParam::Address(raw))
            }
            ValueType::FixedBytes(_) => {
                let raw = Vec::from_hex(hex_digits.unwrap_or(trimmed)).map_err(|_| unparsable())?;
                Ok(DynamicParam::Bytes(raw))
            }
            ValueType::Uint(_) => {
                let value = match hex_digits {
                    Some(digits) => U256::from_str_radix(digits, 16),
                    None => U256::from_str_radix(trimmed, 10),
                };
                value.map(DynamicParam::Uint).map_err(|_| unparsable())
            }
            ValueType::Int(_) => I256::from_str_radix(trimmed, 10)
                .map(DynamicParam::Int)
                .map_err(|_| unparsable()),
            ValueType::Bool => match trimmed {
                "true" => Ok(DynamicParam::Bool(true)),
                "false" => Ok(DynamicParam::Bool(false)),
                _ => Err(unparsable()),
            },
            ValueType::String => Ok(DynamicParam::Word(input.to_owned())),
            _ => Err(unparsable()),
        }
    }

    fn to_value(&self) -> Option<DecodedValue> {
        match self {
            DynamicParam::Address(a) => Some(DecodedValue::Address(*a)),
            DynamicParam::Bytes(b) => Some(DecodedValue::FixedBytes(b.clone())),
            DynamicParam::Uint(u) => Some(DecodedValue::Uint(*u)),
            DynamicParam::Int(i) => Some(DecodedValue::Int(*i)),
            DynamicParam::Bool(b) => Some(DecodedValue::Bool(*b)),
            DynamicParam::Word(_) => None,
        }
    }
}

impl From<[u8; ADDRESS_LEN]> for DynamicParam {
    fn from(a: [u8; ADDRESS_LEN]) -> Self {
        DynamicParam::Address(a)
    }
}

impl From<U256> for DynamicParam {
    fn from(u: U256) -> Self {
        DynamicParam::Uint(u)
    }
}

impl From<&str> for DynamicParam {
    fn from(word: &str) -> Self {
        DynamicParam::Word(word.to_owned())
    }
}

/// One `:`-separated part of a mapping name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    /// A literal word, contributing the leading bytes of its keccak-256 hash.
    Word(String),
    /// A `<type>` placeholder.
    Dynamic(ValueType),
}

impl KeyPart {
    fn parse(name: &str, key_type: KeyType, part: &str) -> Result<Self, SchemaError> {
        let invalid = |reason| SchemaError::InvalidName {
            name: name.to_owned(),
            key_type,
            reason,
        };
        if part.is_empty() {
            return Err(invalid("empty name part"));
        }
        let Some(inner) = part.strip_prefix('<') else {
            if part.contains(['<', '>']) {
                return Err(invalid("misplaced '<' or '>' in name part"));
            }
            return Ok(KeyPart::Word(part.to_owned()));
        };
        let Some(token) = inner.strip_suffix('>') else {
            return Err(invalid("unterminated dynamic part"));
        };
        let ty: ValueType = token.parse()?;
        if !(ty.is_scalar() || ty == ValueType::String) {
            return Err(UnsupportedValueType::new(
                token,
                "dynamic key parts must be fixed-width scalars or string",
            )
            .into());
        }
        Ok(KeyPart::Dynamic(ty))
    }

    fn word(name: &str, key_type: KeyType, part: &str) -> Result<String, SchemaError> {
        match KeyPart::parse(name, key_type, part)? {
            KeyPart::Word(word) => Ok(word),
            KeyPart::Dynamic(_) => Err(SchemaError::InvalidName {
                name: name.to_owned(),
                key_type,
                reason: "the first part of a mapping must be a word",
            }),
        }
    }

    fn dynamic_type(&self) -> Option<&ValueType> {
        match self {
            KeyPart::Word(_) => None,
            KeyPart::Dynamic(ty) => Some(ty),
        }
    }

    /// The part's bytes in a segment of `width` bytes.
    fn segment<'p>(
        &self,
        width: usize,
        params: &mut impl Iterator<Item = &'p DynamicParam>,
        supplied: usize,
        expected: usize,
    ) -> Result<Vec<u8>, InvalidDynamicParameter> {
        match self {
            KeyPart::Word(word) => Ok(keccak256(word)[..width].to_vec()),
            KeyPart::Dynamic(ty) => {
                let param = params.next().ok_or(InvalidDynamicParameter::Count {
                    expected,
                    found: supplied,
                })?;
                param_segment(ty, param, width)
            }
        }
    }

    /// The part as written in a key template: hex, or the `<type>` placeholder.
    fn template(&self, width: usize) -> String {
        match self {
            KeyPart::Word(word) => hex::encode(&keccak256(word)[..width]),
            KeyPart::Dynamic(ty) => format!("<{ty}>"),
        }
    }
}

/// Encodes a dynamic parameter for a placeholder of type `ty` and fits it
/// into a key segment of `width` bytes.
fn param_segment(
    ty: &ValueType,
    param: &DynamicParam,
    width: usize,
) -> Result<Vec<u8>, InvalidDynamicParameter> {
    let wrong_kind = || InvalidDynamicParameter::WrongKind {
        ty: ty.clone(),
        found: param.kind(),
    };
    match (ty, param) {
        (ValueType::String, DynamicParam::Word(word)) => Ok(keccak256(word)[..width].to_vec()),
        (ValueType::String, _) => Err(wrong_kind()),
        _ => {
            let value = param.to_value().ok_or_else(wrong_kind)?;
            let natural = codec::encode_value(ty, &value).map_err(|err| match err {
                EncodeError::OutOfRange { .. } => InvalidDynamicParameter::TooWide { ty: ty.clone() },
                _ => wrong_kind(),
            })?;
            let alignment = ty.alignment().ok_or_else(wrong_kind)?;
            Ok(alignment.align(&natural, width))
        }
    }
}

/// A schema name, split into the parts its key type derives the key from.
///
/// Construction validates that the name has the shape the key type needs,
/// so every `KeyName` can always produce a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyName {
    Singleton {
        name: String,
    },
    /// `name` ends with `[]`; its hash addresses the array length.
    Array {
        name: String,
    },
    Mapping {
        first: String,
        second: KeyPart,
    },
    /// Only four bytes of the second part survive, so two second words may
    /// collide under the same first word. This is accepted by the standard;
    /// callers that care must pick distinct words.
    MappingWithGrouping {
        first: String,
        second: KeyPart,
        third: KeyPart,
    },
}

impl KeyName {
    pub fn parse(name: &str, key_type: KeyType) -> Result<Self, SchemaError> {
        let invalid = |reason| SchemaError::InvalidName {
            name: name.to_owned(),
            key_type,
            reason,
        };
        match key_type {
            KeyType::Singleton => {
                if name.is_empty() {
                    return Err(invalid("empty name"));
                }
                if name.contains(['<', '>']) {
                    return Err(invalid("singleton names cannot contain dynamic parts"));
                }
                if name.ends_with("[]") {
                    return Err(invalid("names ending in [] use the Array key type"));
                }
                Ok(KeyName::Singleton {
                    name: name.to_owned(),
                })
            }
            KeyType::Array => {
                if name.len() <= 2 || !name.ends_with("[]") {
                    return Err(invalid("array names must end with []"));
                }
                if name.contains(['<', '>']) {
                    return Err(invalid("array names cannot contain dynamic parts"));
                }
                Ok(KeyName::Array {
                    name: name.to_owned(),
                })
            }
            KeyType::Mapping => match name.split(':').collect::<Vec<_>>()[..] {
                [first, second] => Ok(KeyName::Mapping {
                    first: KeyPart::word(name, key_type, first)?,
                    second: KeyPart::parse(name, key_type, second)?,
                }),
                _ => Err(invalid("mapping names have two ':'-separated parts")),
            },
            KeyType::MappingWithGrouping => match name.split(':').collect::<Vec<_>>()[..] {
                [first, second, third] => Ok(KeyName::MappingWithGrouping {
                    first: KeyPart::word(name, key_type, first)?,
                    second: KeyPart::parse(name, key_type, second)?,
                    third: KeyPart::parse(name, key_type, third)?,
                }),
                _ => Err(invalid("grouped mapping names have three ':'-separated parts")),
            },
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            KeyName::Singleton { .. } => KeyType::Singleton,
            KeyName::Array { .. } => KeyType::Array,
            KeyName::Mapping { .. } => KeyType::Mapping,
            KeyName::MappingWithGrouping { .. } => KeyType::MappingWithGrouping,
        }
    }

    /// The placeholder types in the order their parameters are expected.
    pub fn dynamic_types(&self) -> Vec<&ValueType> {
        match self {
            KeyName::Singleton { .. } | KeyName::Array { .. } => Vec::new(),
            KeyName::Mapping { second, .. } => second.dynamic_type().into_iter().collect(),
            KeyName::MappingWithGrouping { second, third, .. } => second
                .dynamic_type()
                .into_iter()
                .chain(third.dynamic_type())
                .collect(),
        }
    }

    /// The key segments as `(offset, width, part)`; `None` parts are the
    /// fixed zero separator.
    fn segments(&self) -> Vec<(usize, usize, Option<&KeyPart>)> {
        match self {
            KeyName::Singleton { .. } | KeyName::Array { .. } => Vec::new(),
            KeyName::Mapping { second, .. } => vec![
                (MAPPING_FIRST_LEN, SEPARATOR_LEN, None),
                (MAPPING_FIRST_LEN + SEPARATOR_LEN, MAPPING_LAST_LEN, Some(second)),
            ],
            KeyName::MappingWithGrouping { second, third, .. } => vec![
                (GROUP_FIRST_LEN, GROUP_SECOND_LEN, Some(second)),
                (GROUP_FIRST_LEN + GROUP_SECOND_LEN, SEPARATOR_LEN, None),
                (
                    GROUP_FIRST_LEN + GROUP_SECOND_LEN + SEPARATOR_LEN,
                    MAPPING_LAST_LEN,
                    Some(third),
                ),
            ],
        }
    }

    fn first_word(&self) -> (&str, usize) {
        match self {
            KeyName::Singleton { name } | KeyName::Array { name } => (name, KEY_LEN),
            KeyName::Mapping { first, .. } => (first, MAPPING_FIRST_LEN),
            KeyName::MappingWithGrouping { first, .. } => (first, GROUP_FIRST_LEN),
        }
    }

    fn derive(&self, params: &[DynamicParam]) -> Result<StorageKey, InvalidDynamicParameter> {
        let expected = self.dynamic_types().len();
        if params.len() != expected {
            return Err(InvalidDynamicParameter::Count {
                expected,
                found: params.len(),
            });
        }
        let (first, first_len) = self.first_word();
        let mut raw: RawKey = [0; KEY_LEN];
        raw[..first_len].copy_from_slice(&keccak256(first)[..first_len]);
        let supplied = params.len();
        let mut params = params.iter();
        for (offset, width, part) in self.segments() {
            if let Some(part) = part {
                let segment = part.segment(width, &mut params, supplied, expected)?;
                raw[offset..offset + width].copy_from_slice(&segment);
            }
        }
        Ok(StorageKey::new(raw))
    }

    fn template(&self) -> String {
        let (first, first_len) = self.first_word();
        let mut out = format!("0x{}", hex::encode(&keccak256(first)[..first_len]));
        for (_, width, part) in self.segments() {
            match part {
                Some(part) => out.push_str(&part.template(width)),
                None => out.push_str(&"00".repeat(width)),
            }
        }
        out
    }

    /// Whether `key` agrees with every byte of this name that does not
    /// depend on a dynamic parameter.
    fn matches(&self, key: &StorageKey) -> bool {
        let (first, first_len) = self.first_word();
        if key.raw[..first_len] != keccak256(first)[..first_len] {
            return false;
        }
        self.segments().into_iter().all(|(offset, width, part)| {
            let bytes = &key.raw[offset..offset + width];
            match part {
                None => bytes.iter().all(|&b| b == 0),
                Some(KeyPart::Word(word)) => bytes == &keccak256(word)[..width],
                Some(KeyPart::Dynamic(_)) => true,
            }
        })
    }

    /// Reads the dynamic parameters back out of a key matching this name.
    ///
    /// Parameters that were cut to fit their segment (and `<string>` hashes)
    /// come back as the raw segment bytes.
    fn params(&self, key: &StorageKey) -> Vec<DecodedValue> {
        let mut out = Vec::new();
        for (offset, width, part) in self.segments() {
            let Some(KeyPart::Dynamic(ty)) = part else {
                continue;
            };
            let segment = &key.raw[offset..offset + width];
            let natural = ty.fixed_width().zip(ty.alignment()).and_then(|(natural, alignment)| {
                alignment
                    .unpad(segment, natural)
                    .and_then(|bytes| codec::decode_value(ty, bytes).ok())
            });
            out.push(natural.unwrap_or_else(|| DecodedValue::FixedBytes(segment.to_vec())));
        }
        out
    }
}

/// A validated ERC725Y schema declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    name: String,
    key_name: KeyName,
    value_type: ValueType,
    value_content: String,
}

impl SchemaEntry {
    /// Validates a declaration. `value_content` is a documentation label and
    /// does not influence the encoding.
    pub fn new(
        name: &str,
        key_type: KeyType,
        value_type: &str,
        value_content: &str,
    ) -> Result<Self, SchemaError> {
        Ok(SchemaEntry {
            name: name.to_owned(),
            key_name: KeyName::parse(name, key_type)?,
            value_type: value_type.parse()?,
            value_content: value_content.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_type(&self) -> KeyType {
        self.key_name.key_type()
    }

    pub fn key_name(&self) -> &KeyName {
        &self.key_name
    }

    /// The type of the stored value. For `Array` schemas this is the
    /// element type.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn value_content(&self) -> &str {
        &self.value_content
    }

    /// Whether deriving the key needs dynamic parameters.
    pub fn is_dynamic(&self) -> bool {
        !self.key_name.dynamic_types().is_empty()
    }

    /// The storage key for the given dynamic parameters, one per `<type>`
    /// placeholder in name order.
    pub fn derive_key(&self, params: &[DynamicParam]) -> Result<StorageKey, InvalidDynamicParameter> {
        self.key_name.derive(params)
    }

    /// Like [SchemaEntry::derive_key], reading each parameter from text.
    pub fn derive_key_from_str(&self, params: &[&str]) -> Result<StorageKey, InvalidDynamicParameter> {
        let types = self.key_name.dynamic_types();
        if types.len() != params.len() {
            return Err(InvalidDynamicParameter::Count {
                expected: types.len(),
                found: params.len(),
            });
        }
        let params = types
            .into_iter()
            .zip(params)
            .map(|(ty, input)| DynamicParam::parse(ty, input))
            .collect::<Result<Vec<_>, _>>()?;
        self.derive_key(&params)
    }

    /// The key as written in schema files: the full hex key for static
    /// names, or the hex prefix with `<type>` placeholders left open.
    ///
    /// ```
    /// use lsp2_schema::schema::{KeyType, SchemaEntry};
    ///
    /// let schema = SchemaEntry::new(
    ///     "LSP5ReceivedAssetsMap:<address>",
    ///     KeyType::Mapping,
    ///     "(bytes4,uint128)",
    ///     "(Bytes4,Number)",
    /// )
    /// .unwrap();
    /// assert_eq!(schema.key_template(), "0x812c4334633eb816c80d0000<address>");
    /// ```
    pub fn key_template(&self) -> String {
        self.key_name.template()
    }

    /// The key of a schema without placeholders.
    pub fn static_key(&self) -> Option<StorageKey> {
        if self.is_dynamic() {
            None
        } else {
            self.derive_key(&[]).ok()
        }
    }

    /// Whether `key` could have been derived from this schema.
    pub fn matches_key(&self, key: &StorageKey) -> bool {
        self.key_name.matches(key)
    }

    /// The dynamic parameters encoded in `key`, if it matches this schema.
    pub fn key_params(&self, key: &StorageKey) -> Option<Vec<DecodedValue>> {
        self.matches_key(key).then(|| self.key_name.params(key))
    }

    /// Encodes a value for this schema's key.
    pub fn encode(&self, value: &DecodedValue) -> Result<Vec<u8>, EncodeError> {
        codec::encode_value(&self.value_type, value)
    }

    /// Decodes bytes read from this schema's key.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedValue, codec::MalformedValue> {
        codec::decode_value(&self.value_type, bytes)
    }
}

/// Derives the storage key of `schema`. See [SchemaEntry::derive_key].
pub fn derive_key(
    schema: &SchemaEntry,
    params: &[DynamicParam],
) -> Result<StorageKey, InvalidDynamicParameter> {
    schema.derive_key(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn schema(name: &str, key_type: KeyType, value_type: &str) -> SchemaEntry {
        SchemaEntry::new(name, key_type, value_type, "Mixed").expect("valid schema")
    }

    #[test]
    fn key_type_names() {
        for key_type in [
            KeyType::Singleton,
            KeyType::Array,
            KeyType::Mapping,
            KeyType::MappingWithGrouping,
        ] {
            assert_eq!(key_type.to_string().parse::<KeyType>().unwrap(), key_type);
        }
        assert!(matches!(
            "mapping".parse::<KeyType>(),
            Err(SchemaError::UnknownKeyType(name)) if name == "mapping"
        ));
    }

    #[test]
    fn singleton_is_full_hash() {
        let key = schema("LSP3Profile", KeyType::Singleton, "bytes")
            .derive_key(&[])
            .unwrap();
        assert_eq!(key.raw, keccak256("LSP3Profile"));
        assert_eq!(
            key.raw,
            hex!("5ef83ad9559033e6e941db7d7c495acdce616347d28e90c7ce47cbfcfcad3bc5")
        );
    }

    #[test]
    fn array_base_and_element_keys() {
        let entry = schema("LSP5ReceivedAssets[]", KeyType::Array, "address");
        let base = entry.derive_key(&[]).unwrap();
        assert_eq!(
            base.raw,
            hex!("6460ee3c0aac563ccbf76d6e1d07bada78e3a9514e6382b736ed3f478ab7b90b")
        );
        let element = base.array_element(5);
        assert_eq!(element.raw[..16], base.raw[..16]);
        assert_eq!(element.raw[16..], 5u128.to_be_bytes());
    }

    #[test]
    fn mapping_word_word() {
        let key = schema("A:B", KeyType::Mapping, "bytes").derive_key(&[]).unwrap();
        let mut expected = [0u8; 32];
        expected[..10].copy_from_slice(&keccak256("A")[..10]);
        expected[12..].copy_from_slice(&keccak256("B")[..20]);
        assert_eq!(key.raw, expected);
    }

    #[test]
    fn supported_standards_literal() {
        let key = schema("SupportedStandards:LSP3Profile", KeyType::Mapping, "bytes4")
            .derive_key(&[])
            .unwrap();
        assert_eq!(
            key.raw,
            hex!("eafec4d89fa9619884b600005ef83ad9559033e6e941db7d7c495acdce616347")
        );
    }

    #[test]
    fn mapping_with_address_parameter() {
        let entry = schema(
            "LSP5ReceivedAssetsMap:<address>",
            KeyType::Mapping,
            "(bytes4,uint128)",
        );
        let address = hex!("cafecafecafecafecafecafecafecafecafecafe");
        let key = entry.derive_key(&[address.into()]).unwrap();
        assert_eq!(
            key.raw,
            hex!("812c4334633eb816c80d0000cafecafecafecafecafecafecafecafecafecafe")
        );
        assert_eq!(
            entry.derive_key_from_str(&["0xcafecafecafecafecafecafecafecafecafecafe"]),
            Ok(key)
        );
        assert_eq!(
            entry.key_params(&key),
            Some(vec![DecodedValue::Address(address)])
        );
    }

    #[test]
    fn mapping_with_grouping() {
        let entry = schema(
            "AddressPermissions:Permissions:<address>",
            KeyType::MappingWithGrouping,
            "bytes32",
        );
        assert_eq!(entry.key_template(), "0x4b80742de2bf82acb3630000<address>");
        let key = entry.derive_key(&[[0x11u8; 20].into()]).unwrap();
        assert_eq!(key.raw[..6], hex!("4b80742de2bf"));
        assert_eq!(key.raw[6..10], hex!("82acb363"));
        assert_eq!(key.raw[10..12], [0, 0]);
        assert_eq!(key.raw[12..], [0x11; 20]);

        let words = schema("A:B:C", KeyType::MappingWithGrouping, "bool")
            .derive_key(&[])
            .unwrap();
        assert_eq!(words.raw[..6], keccak256("A")[..6]);
        assert_eq!(words.raw[6..10], keccak256("B")[..4]);
        assert_eq!(words.raw[12..], keccak256("C")[..20]);
    }

    #[test]
    fn numbers_are_left_aligned_in_keys() {
        let entry = schema("Votes:<uint32>", KeyType::Mapping, "bool");
        let key = entry.derive_key(&[DynamicParam::Uint(U256::new(7))]).unwrap();
        assert_eq!(key.raw[12..28], [0; 16]);
        assert_eq!(key.raw[28..], [0, 0, 0, 7]);
        assert_eq!(
            entry.key_params(&key),
            Some(vec![DecodedValue::Uint(U256::new(7))])
        );
    }

    #[test]
    fn wide_bytes_are_right_cut() {
        let entry = schema("Metadata:<bytes32>", KeyType::Mapping, "bytes");
        let param = DynamicParam::Bytes((0u8..32).collect());
        let key = entry.derive_key(&[param]).unwrap();
        assert_eq!(key.raw[12..], (0u8..20).collect::<Vec<_>>()[..]);
        assert_eq!(
            entry.key_template(),
            format!("0x{}0000<bytes32>", hex::encode(&keccak256("Metadata")[..10]))
        );
    }

    #[test]
    fn short_bytes_are_right_padded() {
        let entry = schema("Interfaces:<bytes4>", KeyType::Mapping, "bool");
        let key = entry.derive_key_from_str(&["0xcafecafe"]).unwrap();
        assert_eq!(key.raw[12..16], hex!("cafecafe"));
        assert_eq!(key.raw[16..], [0; 16]);
    }

    #[test]
    fn string_parameter_is_hashed() {
        let entry = schema("Tags:<string>", KeyType::Mapping, "bool");
        let dynamic = entry.derive_key(&["design".into()]).unwrap();
        let literal = schema("Tags:design", KeyType::Mapping, "bool")
            .derive_key(&[])
            .unwrap();
        assert_eq!(dynamic, literal);
    }

    #[test]
    fn invalid_parameters() {
        let entry = schema("Votes:<uint8>", KeyType::Mapping, "bool");
        assert_eq!(
            entry.derive_key(&[DynamicParam::Uint(U256::new(256))]),
            Err(InvalidDynamicParameter::TooWide { ty: ValueType::Uint(8) })
        );
        assert_eq!(
            entry.derive_key(&[]),
            Err(InvalidDynamicParameter::Count {
                expected: 1,
                found: 0
            })
        );
        assert_eq!(
            entry.derive_key(&[DynamicParam::Bool(true)]),
            Err(InvalidDynamicParameter::WrongKind {
                ty: ValueType::Uint(8),
                found: "bool"
            })
        );
        assert!(matches!(
            entry.derive_key_from_str(&["twelve"]),
            Err(InvalidDynamicParameter::Unparsable { .. })
        ));

        let bytes4 = schema("Interfaces:<bytes4>", KeyType::Mapping, "bool");
        assert_eq!(
            bytes4.derive_key(&[DynamicParam::Bytes(vec![0; 5])]),
            Err(InvalidDynamicParameter::TooWide {
                ty: ValueType::FixedBytes(4)
            })
        );
    }

    #[test]
    fn invalid_declarations() {
        assert_eq!(
            "Dictionary".parse::<KeyType>(),
            Err(SchemaError::UnknownKeyType("Dictionary".into()))
        );
        for (name, key_type) in [
            ("Tags", KeyType::Array),
            ("Tags[]", KeyType::Singleton),
            ("A:B:C", KeyType::Mapping),
            ("A:B", KeyType::MappingWithGrouping),
            ("<address>:B", KeyType::Mapping),
            ("A:<address", KeyType::Mapping),
            ("A:", KeyType::Mapping),
            ("Profile<x>", KeyType::Singleton),
        ] {
            assert!(
                matches!(
                    SchemaEntry::new(name, key_type, "bytes", "Bytes"),
                    Err(SchemaError::InvalidName { .. })
                ),
                "{name} as {key_type} should be rejected"
            );
        }
        assert!(matches!(
            SchemaEntry::new("A:<bytes>", KeyType::Mapping, "bytes", "Bytes"),
            Err(SchemaError::UnsupportedValueType(_))
        ));
        assert!(matches!(
            SchemaEntry::new("A", KeyType::Singleton, "float", "Number"),
            Err(SchemaError::UnsupportedValueType(_))
        ));
    }

    #[test]
    fn matches_only_own_keys() {
        let entry = schema(
            "LSP5ReceivedAssetsMap:<address>",
            KeyType::Mapping,
            "(bytes4,uint128)",
        );
        let other = schema(
            "LSP12IssuedAssetsMap:<address>",
            KeyType::Mapping,
            "(bytes4,uint128)",
        );
        let key = entry.derive_key(&[[1u8; 20].into()]).unwrap();
        assert!(entry.matches_key(&key));
        assert!(!other.matches_key(&key));
        assert_eq!(other.key_params(&key), None);
    }
}
