use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lsp2_schema::prelude::*;

fn addresses(count: usize) -> Vec<[u8; 20]> {
    (0..count)
        .map(|i| {
            let mut address = [0u8; 20];
            address[12..].copy_from_slice(&(i as u64).to_be_bytes());
            address
        })
        .collect()
}

fn key_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("key");

    group.bench_function("singleton", |b| {
        let schema = lsp3::profile();
        b.iter(|| black_box(schema).derive_key(&[]).unwrap());
    });

    for i in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*i));
        group.bench_with_input(BenchmarkId::new("mapping", i), i, |b, &i| {
            let schema = lsp3::received_assets_map();
            let params: Vec<_> = addresses(i as usize)
                .into_iter()
                .map(DynamicParam::Address)
                .collect();
            b.iter(|| {
                for param in black_box(&params) {
                    black_box(schema.derive_key(std::slice::from_ref(param)).unwrap());
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("find_by_key", i), i, |b, &i| {
            let schemas = lsp3::schemas();
            let base = lsp3::received_assets().static_key().unwrap();
            let keys: Vec<_> = (0..i as u128).map(|n| base.array_element(n)).collect();
            b.iter(|| {
                black_box(&keys)
                    .iter()
                    .filter(|key| schemas.find_by_key(key).is_some())
                    .count()
            });
        });
    }
    group.finish();
}

fn codec_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let tuple: ValueType = "(bytes4,uint128)".parse().unwrap();
    let entry = DecodedValue::Tuple(vec![
        DecodedValue::FixedBytes(vec![0xca, 0xfe, 0xca, 0xfe]),
        DecodedValue::from(5u64),
    ]);
    group.bench_function("tuple/encode", |b| {
        b.iter(|| encode_value(black_box(&tuple), black_box(&entry)).unwrap());
    });
    let bytes = encode_value(&tuple, &entry).unwrap();
    group.bench_function("tuple/decode", |b| {
        b.iter(|| decode_value(black_box(&tuple), black_box(&bytes)).unwrap());
    });

    let array: ValueType = "address[]".parse().unwrap();
    for i in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*i));
        let value = DecodedValue::Array(
            addresses(*i as usize)
                .into_iter()
                .map(DecodedValue::Address)
                .collect(),
        );
        group.bench_with_input(BenchmarkId::new("array/encode", i), &value, |b, value| {
            b.iter(|| encode_value(black_box(&array), black_box(value)).unwrap());
        });
        let bytes = encode_value(&array, &value).unwrap();
        group.bench_with_input(BenchmarkId::new("array/decode", i), &bytes, |b, bytes| {
            b.iter_with_large_drop(|| decode_value(black_box(&array), black_box(bytes)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, key_benchmark, codec_benchmark);

criterion_main!(benches);
