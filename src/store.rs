//! Reading and writing schema values through an ERC725Y key-value store.
//!
//! The store itself is external (a contract read over RPC, a batch of
//! pending `setData` calls, ...). [KeyValueStore] is the seam, and
//! [MemoryStore] is an in-memory implementation.

use core::fmt;
use std::collections::BTreeMap;
use std::convert::Infallible;

use ethnum::U256;

use crate::codec::{DecodedValue, EncodeError, MalformedValue};
use crate::error::ErrorKind;
use crate::key::StorageKey;
use crate::schema::{DynamicParam, InvalidDynamicParameter, KeyType, SchemaEntry};
use crate::valuetype::WORD_LEN;

/// Width of the `uint128` array length written by most LSP2 tooling.
const SHORT_LENGTH_LEN: usize = 16;

/// An ERC725Y-style store of byte values under 32-byte keys.
///
/// Absent keys and keys holding an empty value are the same thing.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get_data(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Writes `value` under `key`; an empty value clears the key.
    fn set_data(&mut self, key: StorageKey, value: Vec<u8>) -> Result<(), Self::Error>;
}

/// Error raised while moving schema values in or out of a store.
#[derive(Debug)]
pub enum StoreError<E> {
    Backend(E),
    Key(InvalidDynamicParameter),
    Encode(EncodeError),
    /// The bytes under `key` do not decode as the schema's value type.
    Malformed { key: StorageKey, source: MalformedValue },
    /// An array operation was attempted on a schema of another key type.
    NotAnArray { name: String },
    /// An array's length says element `index` exists but its key is empty.
    MissingElement { name: String, index: u128 },
}

impl<E> StoreError<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Backend(_) => ErrorKind::Backend,
            Self::Key(_) | Self::Encode(_) => ErrorKind::Input,
            Self::NotAnArray { .. } => ErrorKind::Schema,
            Self::Malformed { .. } | Self::MissingElement { .. } => ErrorKind::Data,
        }
    }
}

impl<E: fmt::Display> fmt::Display for StoreError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "store error: {err}"),
            Self::Key(err) => write!(f, "bad key parameter: {err}"),
            Self::Encode(err) => write!(f, "bad value: {err}"),
            Self::Malformed { key, source } => {
                write!(f, "bad on-chain data: value under {key}: {source}")
            }
            Self::NotAnArray { name } => write!(f, "bad schema: {name:?} is not an Array"),
            Self::MissingElement { name, index } => {
                write!(f, "bad on-chain data: element {index} of {name:?} is missing")
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for StoreError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            Self::Key(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Malformed { source, .. } => Some(source),
            Self::NotAnArray { .. } | Self::MissingElement { .. } => None,
        }
    }
}

impl<E> From<InvalidDynamicParameter> for StoreError<E> {
    fn from(err: InvalidDynamicParameter) -> Self {
        Self::Key(err)
    }
}

impl<E> From<EncodeError> for StoreError<E> {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

/// An in-memory store, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    data: BTreeMap<StorageKey, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The stored pairs in key order, ready for a batched `setData` call.
    pub fn into_batch(self) -> Vec<(StorageKey, Vec<u8>)> {
        self.data.into_iter().collect()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get_data(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.data.get(key).cloned())
    }

    fn set_data(&mut self, key: StorageKey, value: Vec<u8>) -> Result<(), Self::Error> {
        if value.is_empty() {
            self.data.remove(&key);
        } else {
            self.data.insert(key, value);
        }
        Ok(())
    }
}

fn get<S: KeyValueStore>(
    store: &S,
    key: &StorageKey,
) -> Result<Option<Vec<u8>>, StoreError<S::Error>> {
    let value = store.get_data(key).map_err(StoreError::Backend)?;
    Ok(value.filter(|bytes| !bytes.is_empty()))
}

fn decode_at<E>(
    schema: &SchemaEntry,
    key: StorageKey,
    bytes: &[u8],
) -> Result<DecodedValue, StoreError<E>> {
    schema
        .decode(bytes)
        .map_err(|source| StoreError::Malformed { key, source })
}

/// Reads and decodes the value of `schema` for the given dynamic parameters.
pub fn read_value<S: KeyValueStore>(
    store: &S,
    schema: &SchemaEntry,
    params: &[DynamicParam],
) -> Result<Option<DecodedValue>, StoreError<S::Error>> {
    let key = schema.derive_key(params)?;
    get(store, &key)?
        .map(|bytes| decode_at(schema, key, &bytes))
        .transpose()
}

/// Encodes and writes `value` for `schema`, returning the key written.
pub fn write_value<S: KeyValueStore>(
    store: &mut S,
    schema: &SchemaEntry,
    params: &[DynamicParam],
    value: &DecodedValue,
) -> Result<StorageKey, StoreError<S::Error>> {
    let key = schema.derive_key(params)?;
    let bytes = schema.encode(value)?;
    store.set_data(key, bytes).map_err(StoreError::Backend)?;
    Ok(key)
}

fn array_base<E>(schema: &SchemaEntry) -> Result<StorageKey, StoreError<E>> {
    if schema.key_type() != KeyType::Array {
        return Err(StoreError::NotAnArray {
            name: schema.name().to_owned(),
        });
    }
    Ok(schema.derive_key(&[])?)
}

/// Reads the number of elements of an `Array` schema.
///
/// The length is accepted both as a 16-byte `uint128` and as a 32-byte
/// `uint256`; an absent length means an empty array.
pub fn read_array_len<S: KeyValueStore>(
    store: &S,
    schema: &SchemaEntry,
) -> Result<u128, StoreError<S::Error>> {
    let base = array_base(schema)?;
    let Some(bytes) = get(store, &base)? else {
        return Ok(0);
    };
    let malformed = |source| StoreError::Malformed { key: base, source };
    match bytes.len() {
        SHORT_LENGTH_LEN => {
            let mut raw = [0u8; SHORT_LENGTH_LEN];
            raw.copy_from_slice(&bytes);
            Ok(u128::from_be_bytes(raw))
        }
        WORD_LEN => {
            let mut raw = [0u8; WORD_LEN];
            raw.copy_from_slice(&bytes);
            let len = U256::from_be_bytes(raw);
            u128::try_from(len).map_err(|_| {
                malformed(MalformedValue::ArrayTooLong {
                    count: len,
                    remaining: 0,
                })
            })
        }
        found => Err(malformed(MalformedValue::WidthMismatch {
            ty: crate::valuetype::ValueType::Uint(256),
            expected: WORD_LEN,
            found,
        })),
    }
}

/// Reads every element of an `Array` schema in index order.
pub fn read_array<S: KeyValueStore>(
    store: &S,
    schema: &SchemaEntry,
) -> Result<Vec<DecodedValue>, StoreError<S::Error>> {
    let base = array_base(schema)?;
    let len = read_array_len(store, schema)?;
    let mut items = Vec::new();
    for index in 0..len {
        let key = base.array_element(index);
        let bytes = get(store, &key)?.ok_or_else(|| StoreError::MissingElement {
            name: schema.name().to_owned(),
            index,
        })?;
        items.push(decode_at(schema, key, &bytes)?);
    }
    Ok(items)
}

/// Writes `items` as the elements of an `Array` schema.
///
/// The length is written as a 32-byte `uint256`. Elements left over from a
/// longer previous array are cleared.
pub fn write_array<S: KeyValueStore>(
    store: &mut S,
    schema: &SchemaEntry,
    items: &[DecodedValue],
) -> Result<(), StoreError<S::Error>> {
    let base = array_base(schema)?;
    // An unreadable length is overwritten; its stale elements are found by
    // probing consecutive element keys instead.
    let previous = match read_array_len(store, schema) {
        Ok(len) => Some(len),
        Err(StoreError::Malformed { source, .. }) => {
            log::warn!("replacing malformed length of {}: {}", schema.name(), source);
            None
        }
        Err(err) => return Err(err),
    };
    let encoded = items
        .iter()
        .map(|item| schema.encode(item))
        .collect::<Result<Vec<_>, _>>()?;
    let len = encoded.len() as u128;
    for (index, bytes) in encoded.into_iter().enumerate() {
        store
            .set_data(base.array_element(index as u128), bytes)
            .map_err(StoreError::Backend)?;
    }
    match previous {
        Some(previous) => {
            for index in len..previous {
                store
                    .set_data(base.array_element(index), Vec::new())
                    .map_err(StoreError::Backend)?;
            }
        }
        None => {
            let mut index = len;
            while get(store, &base.array_element(index))?.is_some() {
                store
                    .set_data(base.array_element(index), Vec::new())
                    .map_err(StoreError::Backend)?;
                index += 1;
            }
        }
    }
    store
        .set_data(base, U256::new(len).to_be_bytes().to_vec())
        .map_err(StoreError::Backend)?;
    log::debug!("wrote {} elements of {} (previously {:?})", len, schema.name(), previous);
    Ok(())
}
