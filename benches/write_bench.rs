use criterion::{black_box, criterion_group, criterion_main, Criterion};

use datum::conv::BinaryEncoder;
use datum::value::NumericArray;
use datum::{DatumWriter, Schema, Value};

const LEN: usize = 4096;

fn sample() -> Vec<f64> {
    (0..LEN).map(|i| i as f64 * 0.5 - 1000.0).collect()
}

fn bulk_bench(c: &mut Criterion) {
    let schema = Schema::array(Schema::double());
    let value = Value::NumericArray(NumericArray::Double(sample()));
    let writer = DatumWriter::default();
    c.bench_function("write_doubles_bulk", |b| {
        b.iter(|| {
            let mut enc = BinaryEncoder::new();
            writer.write(&schema, black_box(&value), &mut enc).unwrap();
            black_box(enc.into_inner())
        })
    });
}

fn generic_bench(c: &mut Criterion) {
    let schema = Schema::array(Schema::double());
    let value = Value::Array(sample().into_iter().map(Value::Double).collect());
    let writer = DatumWriter::default();
    c.bench_function("write_doubles_generic", |b| {
        b.iter(|| {
            let mut enc = BinaryEncoder::new();
            writer.write(&schema, black_box(&value), &mut enc).unwrap();
            black_box(enc.into_inner())
        })
    });
}

fn counter_bench(c: &mut Criterion) {
    let schema = Schema::array(Schema::double());
    let value = Value::NumericArray(NumericArray::Double(sample()));
    let writer = DatumWriter::default();
    c.bench_function("encoded_len_doubles", |b| {
        b.iter(|| black_box(writer.encoded_len(&schema, black_box(&value)).unwrap()))
    });
}

criterion_group! {
    name = write_benches;
    config = Criterion::default();
    targets = bulk_bench, generic_bench, counter_bench
}

criterion_main!(write_benches);
