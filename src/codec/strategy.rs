//! Proptest strategies producing value types together with matching values.

use ethnum::{I256, U256};
use proptest::collection::vec;
use proptest::prelude::*;

use crate::codec::DecodedValue;
use crate::valuetype::ValueType;

/// Fixed-width scalar types: `bool`, `address`, `uintN`, `intN`, `bytesN`.
pub fn arb_scalar_type() -> impl Strategy<Value = ValueType> {
    prop_oneof![
        Just(ValueType::Bool),
        Just(ValueType::Address),
        (1u16..=32).prop_map(|n| ValueType::Uint(n * 8)),
        (1u16..=32).prop_map(|n| ValueType::Int(n * 8)),
        (1u8..=32).prop_map(ValueType::FixedBytes),
    ]
}

/// Any supported value type, including nested tuples and arrays.
///
/// Tuples are built from fixed-width scalars followed by one arbitrary last
/// member, which keeps them decodable.
pub fn arb_value_type() -> BoxedStrategy<ValueType> {
    let leaf = prop_oneof![
        4 => arb_scalar_type(),
        1 => Just(ValueType::String),
        1 => Just(ValueType::Bytes),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            inner
                .clone()
                .prop_map(|element| ValueType::Array(Box::new(element))),
            (vec(arb_scalar_type(), 0..3), inner).prop_map(|(mut members, last)| {
                members.push(last);
                ValueType::Tuple(members)
            }),
        ]
    })
    .boxed()
}

/// Values of exactly the given type, with `bytesN` always at full width.
pub fn arb_value(ty: &ValueType) -> BoxedStrategy<DecodedValue> {
    match ty {
        ValueType::Bool => any::<bool>().prop_map(DecodedValue::Bool).boxed(),
        ValueType::String => any::<String>().prop_map(DecodedValue::String).boxed(),
        ValueType::Bytes => vec(any::<u8>(), 0..64).prop_map(DecodedValue::Bytes).boxed(),
        ValueType::Address => any::<[u8; 20]>().prop_map(DecodedValue::Address).boxed(),
        ValueType::Uint(bits) => {
            let shift = 256 - u32::from(*bits);
            any::<[u8; 32]>()
                .prop_map(move |raw| DecodedValue::Uint(U256::from_be_bytes(raw) >> shift))
                .boxed()
        }
        ValueType::Int(bits) => {
            let shift = 256 - u32::from(*bits);
            any::<[u8; 32]>()
                .prop_map(move |raw| DecodedValue::Int(I256::from_be_bytes(raw) >> shift))
                .boxed()
        }
        ValueType::FixedBytes(len) => vec(any::<u8>(), *len as usize)
            .prop_map(DecodedValue::FixedBytes)
            .boxed(),
        ValueType::Tuple(members) => members
            .iter()
            .map(arb_value)
            .collect::<Vec<_>>()
            .prop_map(DecodedValue::Tuple)
            .boxed(),
        ValueType::Array(element) => vec(arb_value(element), 0..4)
            .prop_map(DecodedValue::Array)
            .boxed(),
    }
}

/// A value type paired with a value of that type.
pub fn arb_typed_value() -> BoxedStrategy<(ValueType, DecodedValue)> {
    arb_value_type()
        .prop_flat_map(|ty| {
            let value = arb_value(&ty);
            (Just(ty), value)
        })
        .boxed()
}
