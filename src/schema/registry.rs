//! Sets of schemas loaded from ERC725Y JSON schema files.
//!
//! Schema files are JSON arrays of declarations:
//!
//! ```json
//! [
//!   {
//!     "name": "LSP3Profile",
//!     "key": "0x5ef83ad9559033e6e941db7d7c495acdce616347d28e90c7ce47cbfcfcad3bc5",
//!     "keyType": "Singleton",
//!     "valueType": "bytes",
//!     "valueContent": "VerifiableURI"
//!   }
//! ]
//! ```
//!
//! Every declaration is validated on load and its `key` must equal the key
//! (or key template) derived from its name.

use core::fmt;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::DecodedValue;
use crate::key::{StorageKey, ARRAY_PREFIX_LEN};
use crate::schema::{KeyType, SchemaEntry, SchemaError};

/// A schema declaration as written in JSON, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    pub name: String,
    pub key: String,
    pub key_type: String,
    pub value_type: String,
    pub value_content: String,
}

impl TryFrom<SchemaDefinition> for SchemaEntry {
    type Error = SchemaError;

    fn try_from(definition: SchemaDefinition) -> Result<Self, Self::Error> {
        let key_type: KeyType = definition.key_type.parse()?;
        let entry = SchemaEntry::new(
            &definition.name,
            key_type,
            &definition.value_type,
            &definition.value_content,
        )?;
        let expected = entry.key_template();
        if !expected.eq_ignore_ascii_case(&definition.key) {
            return Err(SchemaError::KeyMismatch {
                name: definition.name,
                expected,
                found: definition.key,
            });
        }
        Ok(entry)
    }
}

impl From<&SchemaEntry> for SchemaDefinition {
    fn from(entry: &SchemaEntry) -> Self {
        SchemaDefinition {
            name: entry.name().to_owned(),
            key: entry.key_template(),
            key_type: entry.key_type().to_string(),
            value_type: entry.value_type().to_string(),
            value_content: entry.value_content().to_owned(),
        }
    }
}

/// Error raised while loading a schema file.
#[derive(Debug)]
pub enum RegistryError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A declaration failed validation.
    Schema { name: String, source: SchemaError },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read schema file: {err}"),
            Self::Json(err) => write!(f, "failed to parse schema JSON: {err}"),
            Self::Schema { name, source } => write!(f, "invalid schema {name:?}: {source}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Schema { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// How a storage key relates to a schema in a [SchemaSet].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatch<'a> {
    /// The key of a static schema, or the length key of an array.
    Exact(&'a SchemaEntry),
    /// An element key of an `Array` schema.
    Element { schema: &'a SchemaEntry, index: u128 },
    /// A key of a schema with `<type>` placeholders and the recovered parameters.
    Dynamic {
        schema: &'a SchemaEntry,
        params: Vec<DecodedValue>,
    },
}

impl<'a> KeyMatch<'a> {
    pub fn schema(&self) -> &'a SchemaEntry {
        match self {
            KeyMatch::Exact(schema)
            | KeyMatch::Element { schema, .. }
            | KeyMatch::Dynamic { schema, .. } => *schema,
        }
    }
}

/// A named collection of validated schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    entries: Vec<SchemaEntry>,
    by_name: HashMap<String, usize>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON array of schema declarations.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let mut set = SchemaSet::new();
        set.extend_from_json(json)?;
        Ok(set)
    }

    /// Reads a schema file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let set = SchemaSet::from_json(&json)?;
        log::info!("loaded {} schemas from {}", set.len(), path.display());
        Ok(set)
    }

    /// Adds the declarations in `json`, replacing schemas with the same name.
    ///
    /// Nothing is added if any declaration is invalid.
    pub fn extend_from_json(&mut self, json: &str) -> Result<(), RegistryError> {
        let definitions: Vec<SchemaDefinition> = serde_json::from_str(json)?;
        let entries = definitions
            .into_iter()
            .map(|definition| {
                let name = definition.name.clone();
                SchemaEntry::try_from(definition)
                    .map_err(|source| RegistryError::Schema { name, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for entry in entries {
            self.insert(entry);
        }
        Ok(())
    }

    /// Adds a schema, returning the one it replaced.
    pub fn insert(&mut self, entry: SchemaEntry) -> Option<SchemaEntry> {
        log::debug!("schema {} -> {}", entry.name(), entry.key_template());
        match self.by_name.get(entry.name()) {
            Some(&index) => Some(std::mem::replace(&mut self.entries[index], entry)),
            None => {
                self.by_name.insert(entry.name().to_owned(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the schema a storage key belongs to.
    ///
    /// Static keys win over array elements, which win over dynamic
    /// mappings.
    pub fn find_by_key(&self, key: &StorageKey) -> Option<KeyMatch<'_>> {
        if let Some(entry) = self.iter().find(|e| e.static_key().as_ref() == Some(key)) {
            return Some(KeyMatch::Exact(entry));
        }
        let element = self.iter().find_map(|entry| {
            if entry.key_type() != KeyType::Array {
                return None;
            }
            let base = entry.static_key()?;
            key.has_prefix(&base, ARRAY_PREFIX_LEN).then(|| {
                let mut index = [0u8; 16];
                index.copy_from_slice(&key.raw[ARRAY_PREFIX_LEN..]);
                KeyMatch::Element {
                    schema: entry,
                    index: u128::from_be_bytes(index),
                }
            })
        });
        if element.is_some() {
            return element;
        }
        self.iter()
            .filter(|entry| entry.is_dynamic())
            .find_map(|schema| {
                schema
                    .key_params(key)
                    .map(|params| KeyMatch::Dynamic { schema, params })
            })
    }

    /// Serialises the set back into the JSON schema file format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let definitions: Vec<SchemaDefinition> = self.iter().map(SchemaDefinition::from).collect();
        serde_json::to_string_pretty(&definitions)
    }
}

impl<'a> IntoIterator for &'a SchemaSet {
    type Item = &'a SchemaEntry;
    type IntoIter = std::slice::Iter<'a, SchemaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
