//! LSP3 profile metadata and the storage values that point at it.
//!
//! A profile keeps its metadata off-chain as a JSON document. The
//! `LSP3Profile` key stores a [VerifiableUri] with the document's location
//! and hash, and the LSP5/LSP12 arrays list the assets the profile received
//! and issued.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::codec::DecodedValue;
use crate::key::StorageKey;
use crate::lsp3;
use crate::store::{read_array, read_value, KeyValueStore, StoreError};
use crate::valuetype::ADDRESS_LEN;
use crate::verifiable_uri::{VerifiableUri, VerifiableUriError};
use crate::error::ErrorKind;
use crate::Error;

/// The LSP3 metadata document, `{"LSP3Profile": {...}}`.
///
/// Fields this model does not know are kept and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(rename = "LSP3Profile")]
    pub profile: Lsp3Profile,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lsp3Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile_image: Vec<JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub background_image: Vec<JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avatar: Vec<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

impl ProfileMetadata {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The compact document whose hash goes on chain. Upload exactly these
    /// bytes.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.profile.name = name.into();
    }
}

/// The `setData(key, value)` pair that points `LSP3Profile` at `metadata`
/// uploaded to `url`.
///
/// ```
/// use lsp2_schema::profile::{profile_update, ProfileMetadata};
/// use lsp2_schema::verifiable_uri::VerifiableUri;
///
/// let mut metadata = ProfileMetadata::default();
/// metadata.set_name("alice");
/// let (key, value) = profile_update(&metadata, "ipfs://QmExample").unwrap();
/// assert_eq!(key.to_hex(), "0x5ef83ad9559033e6e941db7d7c495acdce616347d28e90c7ce47cbfcfcad3bc5");
///
/// let uri = VerifiableUri::decode(&value).unwrap();
/// assert!(uri.verify(metadata.to_json().unwrap().as_bytes()));
/// ```
pub fn profile_update(
    metadata: &ProfileMetadata,
    url: &str,
) -> Result<(StorageKey, Vec<u8>), Error> {
    let schema = lsp3::profile();
    let document = metadata.to_json()?;
    let uri = VerifiableUri::for_json(&document, url);
    let key = schema.derive_key(&[])?;
    let value = schema.encode(&DecodedValue::Bytes(uri.encode()?))?;
    log::info!("profile update for {:?}: {} -> {}", metadata.name(), key, url);
    Ok((key, value))
}

/// Error raised while reading profile data from a store.
#[derive(Debug)]
pub enum ProfileError<E> {
    Store(StoreError<E>),
    Uri(VerifiableUriError),
}

impl<E> ProfileError<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) => err.kind(),
            Self::Uri(_) => ErrorKind::Data,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ProfileError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Uri(err) => write!(f, "bad on-chain data: LSP3Profile: {err}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ProfileError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Uri(err) => Some(err),
        }
    }
}

impl<E> From<StoreError<E>> for ProfileError<E> {
    fn from(err: StoreError<E>) -> Self {
        Self::Store(err)
    }
}

impl<E> From<VerifiableUriError> for ProfileError<E> {
    fn from(err: VerifiableUriError) -> Self {
        Self::Uri(err)
    }
}

/// Whether the store declares `SupportedStandards:LSP3Profile`.
pub fn supports_lsp3<S: KeyValueStore>(store: &S) -> Result<bool, StoreError<S::Error>> {
    let value = read_value(store, lsp3::supported_standards(), &[])?;
    Ok(value.as_ref().and_then(DecodedValue::as_bytes) == Some(&lsp3::LSP3_PROFILE_STANDARD[..]))
}

/// Reads the location of the profile metadata, if one is set.
pub fn read_profile_uri<S: KeyValueStore>(
    store: &S,
) -> Result<Option<VerifiableUri>, ProfileError<S::Error>> {
    let Some(value) = read_value(store, lsp3::profile(), &[])? else {
        return Ok(None);
    };
    let bytes = value.as_bytes().unwrap_or_default();
    Ok(Some(VerifiableUri::decode(bytes)?))
}

/// The assets listed on a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAssets {
    pub received: Vec<[u8; ADDRESS_LEN]>,
    pub issued: Vec<[u8; ADDRESS_LEN]>,
}

impl ProfileAssets {
    /// Reads `LSP5ReceivedAssets[]` and `LSP12IssuedAssets[]`.
    pub fn read<S: KeyValueStore>(store: &S) -> Result<Self, StoreError<S::Error>> {
        let addresses = |items: Vec<DecodedValue>| -> Vec<[u8; ADDRESS_LEN]> {
            items
                .iter()
                .filter_map(DecodedValue::as_address)
                .copied()
                .collect()
        };
        Ok(ProfileAssets {
            received: addresses(read_array(store, lsp3::received_assets())?),
            issued: addresses(read_array(store, lsp3::issued_assets())?),
        })
    }
}
