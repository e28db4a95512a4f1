//! Benchmarks for polygon measurement and no-fly checks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dronemap_geo::{measure_polygon, polygon_from_coordinates, Coordinate, NoFlyZones, Polygon};

fn create_ring(vertices: usize) -> Polygon<f64> {
    // Regular polygon around Jerusalem
    let coords: Vec<Coordinate> = (0..vertices)
        .map(|i| {
            let t = i as f64 / vertices as f64 * std::f64::consts::TAU;
            Coordinate::new(31.7683 + 0.05 * t.sin(), 35.2137 + 0.05 * t.cos())
        })
        .collect();
    polygon_from_coordinates(&coords).unwrap()
}

fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure_polygon");

    for size in [4, 64, 1024].iter() {
        let polygon = create_ring(*size);
        group.bench_with_input(BenchmarkId::new("vertices", size), size, |b, _| {
            b.iter(|| measure_polygon(black_box(&polygon)))
        });
    }

    group.finish();
}

fn bench_no_fly_check(c: &mut Criterion) {
    let zones = NoFlyZones::builtin().unwrap();
    let hit = create_ring(64);
    let miss = polygon_from_coordinates(&[
        Coordinate::new(30.5, 34.5),
        Coordinate::new(30.5, 34.55),
        Coordinate::new(30.55, 34.55),
    ])
    .unwrap();

    let mut group = c.benchmark_group("no_fly_check");
    group.bench_function("intersecting", |b| b.iter(|| zones.intersecting(black_box(&hit))));
    group.bench_function("clear", |b| b.iter(|| zones.intersecting(black_box(&miss))));
    group.finish();
}

criterion_group!(benches, bench_measure, bench_no_fly_check);
criterion_main!(benches);
