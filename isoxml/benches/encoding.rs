//! Benchmarks pour l'encodage TASKDATA

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo::{Geometry, LineString, Polygon};
use isoxml::{encode, serialize, FieldFeature, TaskDataEncoder};

fn make_fields(count: usize, vertices: usize) -> Vec<FieldFeature> {
    (0..count)
        .map(|i| {
            let coords: Vec<(f64, f64)> = (0..vertices)
                .map(|v| {
                    let angle = v as f64 / vertices as f64 * std::f64::consts::TAU;
                    (12.0 + i as f64 * 0.01 + angle.cos() * 0.001, 48.9 + angle.sin() * 0.001)
                })
                .collect();
            let polygon = Polygon::new(LineString::from(coords), vec![]);
            FieldFeature::new(Some(format!("Field {}", i)), Some(Geometry::Polygon(polygon)))
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let encoder = TaskDataEncoder::default();
    let mut group = c.benchmark_group("encode");

    for &count in &[10usize, 100, 1000] {
        let fields = make_fields(count, 200);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &fields, |b, fields| {
            b.iter(|| encode(&encoder, black_box(fields.clone())))
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let encoder = TaskDataEncoder::default();
    let doc = encode(&encoder, make_fields(100, 500));

    c.bench_function("serialize_100_fields", |b| {
        b.iter(|| serialize(black_box(&doc), Vec::with_capacity(4 << 20)).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_serialize);
criterion_main!(benches);
