//! Decode/encode benchmarks, with `serde_json` as the reference point.
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Build a moderately nested document of `records` array entries.
fn sample_document(records: usize) -> String {
    let mut doc = String::from("{\"records\":[");
    for i in 0..records {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            "{{\"id\":{i},\"name\":\"record-{i}\",\"score\":{}.5,\
             \"tags\":[\"a\",\"b\"],\"seen\":{}}}",
            i % 100,
            i % 2 == 0
        ));
    }
    doc.push_str("]}");
    doc
}

fn bench_decode(c: &mut Criterion) {
    let doc = sample_document(1_000);
    let mut group = c.benchmark_group("decode");
    group.bench_function("jsonbind", |b| {
        b.iter(|| jsonbind::from_str(black_box(&doc)).unwrap());
    });
    group.bench_function("serde_json", |b| {
        b.iter(|| {
            serde_json::from_str::<serde_json::Value>(black_box(&doc))
                .unwrap()
        });
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let doc = sample_document(1_000);
    let ours = jsonbind::from_str(&doc).unwrap();
    let reference: serde_json::Value = serde_json::from_str(&doc).unwrap();

    let mut group = c.benchmark_group("encode");
    group.bench_function("jsonbind", |b| {
        b.iter(|| jsonbind::to_string(black_box(&ours)).unwrap());
    });
    group.bench_function("serde_json", |b| {
        b.iter(|| serde_json::to_string(black_box(&reference)).unwrap());
    });
    group.finish();
}

fn bench_typed_decode(c: &mut Criterion) {
    let doc = {
        let mut doc = String::from("[");
        for i in 0..10_000 {
            if i > 0 {
                doc.push(',');
            }
            doc.push_str(&i.to_string());
        }
        doc.push(']');
        doc
    };

    c.bench_function("decode_vec_i64", |b| {
        b.iter(|| jsonbind::from_str_as::<Vec<i64>>(black_box(&doc)).unwrap());
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_typed_decode);
criterion_main!(benches);
