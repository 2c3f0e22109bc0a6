//! The types most callers need, for glob import.

pub use crate::codec::{decode_value, encode_value, DecodedValue, EncodeError, MalformedValue};
pub use crate::key::StorageKey;
pub use crate::lsp3;
pub use crate::schema::registry::{KeyMatch, SchemaSet};
pub use crate::schema::{derive_key, DynamicParam, InvalidDynamicParameter, KeyType, SchemaEntry};
pub use crate::store::{read_array, read_value, write_array, write_value, KeyValueStore, MemoryStore};
pub use crate::valuetype::ValueType;
pub use crate::verifiable_uri::VerifiableUri;
pub use crate::Error;
pub use ethnum::{I256, U256};
