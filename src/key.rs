//! 32-byte ERC725Y storage keys.
//!
//! A [StorageKey] is the final identifier under which a value lives in an
//! ERC725Y key-value store. It is always derived from a schema (see
//! [crate::schema]) and never mutated afterwards.

use core::fmt;
use std::borrow::Borrow;
use std::fmt::Debug;
use std::str::FromStr;

use hex::FromHex;
use hex::FromHexError;

/// The length of a storage key in bytes.
pub const KEY_LEN: usize = 32;

/// A raw storage key is simply a 32-byte array.
pub type RawKey = [u8; KEY_LEN];

/// Length of the prefix an array element key shares with the array's base key.
pub const ARRAY_PREFIX_LEN: usize = 16;

/// An immutable 32-byte ERC725Y storage key.
///
/// # Example
///
/// ```
/// use lsp2_schema::key::StorageKey;
///
/// let key: StorageKey = "0x5ef83ad9559033e6e941db7d7c495acdce616347d28e90c7ce47cbfcfcad3bc5"
///     .parse()
///     .unwrap();
/// assert_eq!(key.raw[0], 0x5e);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct StorageKey {
    pub raw: RawKey,
}

impl StorageKey {
    pub const fn new(raw: RawKey) -> Self {
        Self { raw }
    }

    /// Parses a key from 64 hex digits, with or without a `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, FromHexError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        Ok(Self::new(RawKey::from_hex(hex)?))
    }

    /// Lowercase hex with a `0x` prefix, the form used in JSON schema files.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.raw))
    }

    /// Key of element `index` of the array whose length lives under `self`.
    ///
    /// The first 16 bytes of the base key are kept and the index is written
    /// big-endian into the last 16 bytes.
    ///
    /// ```
    /// use lsp2_schema::key::StorageKey;
    ///
    /// let base = StorageKey::new([0xab; 32]);
    /// let element = base.array_element(5);
    /// assert_eq!(element.raw[..16], [0xab; 16]);
    /// assert_eq!(element.raw[31], 5);
    /// ```
    pub fn array_element(&self, index: u128) -> StorageKey {
        let mut raw = [0u8; KEY_LEN];
        raw[..ARRAY_PREFIX_LEN].copy_from_slice(&self.raw[..ARRAY_PREFIX_LEN]);
        raw[ARRAY_PREFIX_LEN..].copy_from_slice(&index.to_be_bytes());
        StorageKey::new(raw)
    }

    /// Whether `self` shares the first `len` bytes with `other`.
    pub fn has_prefix(&self, other: &StorageKey, len: usize) -> bool {
        let len = len.min(KEY_LEN);
        self.raw[..len] == other.raw[..len]
    }
}

impl From<RawKey> for StorageKey {
    fn from(raw: RawKey) -> Self {
        StorageKey::new(raw)
    }
}

impl From<StorageKey> for RawKey {
    fn from(key: StorageKey) -> Self {
        key.raw
    }
}

impl AsRef<[u8]> for StorageKey {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Borrow<RawKey> for StorageKey {
    fn borrow(&self) -> &RawKey {
        &self.raw
    }
}

impl FromStr for StorageKey {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::from_hex(s)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.raw))
    }
}

impl Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey(0x{})", hex::encode(self.raw))
    }
}
