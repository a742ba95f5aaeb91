use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stepquest::geo::{self, Unit};
use stepquest::models::Coordinate;

fn benchmark_geo(c: &mut Criterion) {
    let london = Coordinate {
        latitude: 51.5074,
        longitude: -0.1278,
    };
    let sydney = Coordinate {
        latitude: -33.8688,
        longitude: 151.2093,
    };

    let mut group = c.benchmark_group("geo");

    group.bench_function("distance_km", |b| {
        b.iter(|| geo::distance(black_box(london), black_box(sydney), Unit::Kilometers))
    });

    group.bench_function("interpolate", |b| {
        b.iter(|| geo::interpolate(black_box(london), black_box(sydney), black_box(42.5)))
    });

    group.bench_function("zoom_level", |b| {
        b.iter(|| geo::zoom_level_for_distance(black_box(1234.5)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_geo);
criterion_main!(benches);
