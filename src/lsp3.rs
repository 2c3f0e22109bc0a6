//! The standard schemas a Universal Profile viewer reads.
//!
//! The set is embedded from `lsp3/schemas.json` and validated on first use.

use std::sync::OnceLock;

use hex_literal::hex;

use crate::schema::registry::SchemaSet;
use crate::schema::SchemaEntry;

const SCHEMAS_JSON: &str = include_str!("lsp3/schemas.json");

/// Value stored under `SupportedStandards:LSP3Profile` by LSP3 profiles.
pub const LSP3_PROFILE_STANDARD: [u8; 4] = hex!("5ef83ad9");

pub const SUPPORTED_STANDARDS_LSP3: &str = "SupportedStandards:LSP3Profile";
pub const LSP3_PROFILE: &str = "LSP3Profile";
pub const LSP5_RECEIVED_ASSETS: &str = "LSP5ReceivedAssets[]";
pub const LSP5_RECEIVED_ASSETS_MAP: &str = "LSP5ReceivedAssetsMap:<address>";
pub const LSP12_ISSUED_ASSETS: &str = "LSP12IssuedAssets[]";
pub const LSP12_ISSUED_ASSETS_MAP: &str = "LSP12IssuedAssetsMap:<address>";

/// The embedded standard schema set.
pub fn schemas() -> &'static SchemaSet {
    static SCHEMAS: OnceLock<SchemaSet> = OnceLock::new();
    SCHEMAS.get_or_init(|| {
        SchemaSet::from_json(SCHEMAS_JSON).expect("embedded LSP3 schemas must be valid")
    })
}

fn schema(name: &str) -> &'static SchemaEntry {
    schemas()
        .get(name)
        .expect("embedded LSP3 schemas must contain every named schema")
}

/// `SupportedStandards:LSP3Profile`, a `bytes4` marker.
pub fn supported_standards() -> &'static SchemaEntry {
    schema(SUPPORTED_STANDARDS_LSP3)
}

/// `LSP3Profile`, a VerifiableURI pointing at the profile metadata.
pub fn profile() -> &'static SchemaEntry {
    schema(LSP3_PROFILE)
}

pub fn received_assets() -> &'static SchemaEntry {
    schema(LSP5_RECEIVED_ASSETS)
}

/// `(interface id, index in LSP5ReceivedAssets[])` per received asset.
pub fn received_assets_map() -> &'static SchemaEntry {
    schema(LSP5_RECEIVED_ASSETS_MAP)
}

pub fn issued_assets() -> &'static SchemaEntry {
    schema(LSP12_ISSUED_ASSETS)
}

pub fn issued_assets_map() -> &'static SchemaEntry {
    schema(LSP12_ISSUED_ASSETS_MAP)
}
