use hex_literal::hex;
use lsp2_schema::prelude::*;

fn ty(token: &str) -> ValueType {
    token.parse().unwrap()
}

#[test]
fn fixed_widths() {
    let cases = [
        ("uint32", DecodedValue::from(7u64), 4),
        ("address", DecodedValue::Address([1; 20]), 20),
        ("bytes4", DecodedValue::FixedBytes(vec![1, 2, 3, 4]), 4),
        ("bool", DecodedValue::Bool(true), 1),
        ("int16", DecodedValue::from(-2i64), 2),
    ];
    for (token, value, width) in cases {
        let bytes = encode_value(&ty(token), &value).unwrap();
        assert_eq!(bytes.len(), width, "{token}");
        assert_eq!(decode_value(&ty(token), &bytes).unwrap(), value, "{token}");
    }
}

#[test]
fn numbers_keep_their_low_bytes() {
    let bytes = encode_value(&ty("uint32"), &DecodedValue::from(0x0102u64)).unwrap();
    assert_eq!(bytes, hex!("00000102"));
    let bytes = encode_value(&ty("int16"), &DecodedValue::from(-2i64)).unwrap();
    assert_eq!(bytes, hex!("fffe"));
}

#[test]
fn empty_bool_is_malformed() {
    assert!(matches!(
        decode_value(&ValueType::Bool, &[]),
        Err(MalformedValue::WidthMismatch { expected: 1, found: 0, .. })
    ));
}

#[test]
fn asset_map_tuple() {
    let value = DecodedValue::Tuple(vec![
        DecodedValue::FixedBytes(hex!("cafecafe").to_vec()),
        DecodedValue::from(5u64),
    ]);
    let bytes = encode_value(&ty("(bytes4,uint128)"), &value).unwrap();
    assert_eq!(bytes, hex!("cafecafe 00000000000000000000000000000005"));
    assert_eq!(decode_value(&ty("(bytes4,uint128)"), &bytes).unwrap(), value);
}

#[test]
fn string_and_bytes_are_raw() {
    let bytes = encode_value(&ValueType::String, &DecodedValue::from("alice")).unwrap();
    assert_eq!(bytes, b"alice");
    assert!(matches!(
        decode_value(&ValueType::String, &[0xff, 0xfe]),
        Err(MalformedValue::InvalidUtf8)
    ));
    let bytes = encode_value(&ValueType::Bytes, &DecodedValue::Bytes(vec![])).unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn address_array() {
    let array_ty = ty("address[]");
    let value = DecodedValue::Array(vec![
        DecodedValue::Address([0xaa; 20]),
        DecodedValue::Address([0xbb; 20]),
    ]);
    let bytes = encode_value(&array_ty, &value).unwrap();
    assert_eq!(bytes.len(), 32 * 3);
    assert_eq!(bytes[31], 2);
    assert_eq!(bytes[32..44], [0u8; 12]);
    assert_eq!(bytes[44..64], [0xaa; 20]);
    assert_eq!(decode_value(&array_ty, &bytes).unwrap(), value);

    assert!(matches!(
        decode_value(&array_ty, &bytes[..64]),
        Err(MalformedValue::ArrayTooLong { .. })
    ));
}

#[test]
fn encode_rejects_wrong_values() {
    assert!(matches!(
        encode_value(&ty("uint8"), &DecodedValue::from(256u64)),
        Err(EncodeError::OutOfRange { .. })
    ));
    assert!(matches!(
        encode_value(&ty("address"), &DecodedValue::Bool(true)),
        Err(EncodeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        encode_value(&ty("(bool,bool)"), &DecodedValue::Tuple(vec![true.into()])),
        Err(EncodeError::TupleArity { found: 1, .. })
    ));
}

#[test]
fn unsupported_types() {
    for token in ["float", "uint7", "uint264", "bytes33", "()", "(string,bool)"] {
        assert!(token.parse::<ValueType>().is_err(), "{token}");
    }
}
