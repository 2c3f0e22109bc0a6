use hex_literal::hex;
use lsp2_schema::prelude::*;
use lsp2_schema::profile::{
    profile_update, read_profile_uri, supports_lsp3, ProfileAssets, ProfileMetadata,
};

const ASSET: [u8; 20] = hex!("0102030405060708090a0b0c0d0e0f1011121314");
const LSP7_INTERFACE: [u8; 4] = hex!("c52d6008");

/// Writes what a freshly created profile holds on chain.
fn deploy(metadata: &ProfileMetadata) -> MemoryStore {
    let mut store = MemoryStore::new();
    write_value(
        &mut store,
        lsp3::supported_standards(),
        &[],
        &DecodedValue::FixedBytes(lsp3::LSP3_PROFILE_STANDARD.to_vec()),
    )
    .unwrap();
    let (key, value) = profile_update(metadata, "ipfs://QmFirst").unwrap();
    store.set_data(key, value).unwrap();

    write_array(
        &mut store,
        lsp3::received_assets(),
        &[DecodedValue::Address(ASSET)],
    )
    .unwrap();
    write_value(
        &mut store,
        lsp3::received_assets_map(),
        &[DynamicParam::Address(ASSET)],
        &DecodedValue::Tuple(vec![
            DecodedValue::FixedBytes(LSP7_INTERFACE.to_vec()),
            DecodedValue::from(0u64),
        ]),
    )
    .unwrap();
    store
}

#[test]
fn view_and_rename_profile() {
    let mut metadata = ProfileMetadata::default();
    metadata.set_name("alice");
    let mut store = deploy(&metadata);

    assert!(supports_lsp3(&store).unwrap());
    let uri = read_profile_uri(&store).unwrap().unwrap();
    assert!(uri.verify(metadata.to_json().unwrap().as_bytes()));

    metadata.set_name("alice.lukso");
    let (key, value) = profile_update(&metadata, "ipfs://QmSecond").unwrap();
    store.set_data(key, value).unwrap();

    let uri = read_profile_uri(&store).unwrap().unwrap();
    assert_eq!(uri.url, "ipfs://QmSecond");
    assert!(uri.verify(metadata.to_json().unwrap().as_bytes()));
}

#[test]
fn received_assets_are_indexed() {
    let store = deploy(&ProfileMetadata::default());

    let assets = ProfileAssets::read(&store).unwrap();
    assert_eq!(assets.received, vec![ASSET]);
    assert!(assets.issued.is_empty());

    let entry = read_value(
        &store,
        lsp3::received_assets_map(),
        &[DynamicParam::Address(ASSET)],
    )
    .unwrap()
    .unwrap();
    let fields = entry.as_slice().unwrap();
    assert_eq!(fields[0].as_bytes(), Some(&LSP7_INTERFACE[..]));
    assert_eq!(fields[1].as_uint(), Some(U256::ZERO));
}

#[test]
fn every_stored_key_is_recognised() {
    let store = deploy(&ProfileMetadata::default());
    let batch = store.into_batch();
    assert_eq!(batch.len(), 5);
    for (key, _) in &batch {
        assert!(lsp3::schemas().find_by_key(key).is_some(), "{key}");
    }
}
