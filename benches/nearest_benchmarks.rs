use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geodecode::compute::kdtree::{IndexKey, KdTree};
use geodecode::{Coordinate, Geocoder, Location};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_coordinates(seed: u64, n: usize) -> Vec<Coordinate> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Coordinate::new(
                rng.random_range(-90.0..=90.0),
                rng.random_range(-180.0..=180.0),
            )
        })
        .collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [1_000, 10_000, 100_000] {
        let keys: Vec<IndexKey> = random_coordinates(1, size)
            .into_iter()
            .enumerate()
            .map(|(i, coord)| IndexKey::new(coord, i))
            .collect();

        group.bench_with_input(BenchmarkId::new("kdtree", size), &keys, |b, keys| {
            b.iter(|| KdTree::build(black_box(keys.clone())))
        });
    }

    group.finish();
}

fn benchmark_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    let queries = random_coordinates(2, 1_000);

    for size in [1_000, 10_000, 150_000] {
        let locations: Vec<Location> = random_coordinates(3, size)
            .into_iter()
            .enumerate()
            .map(|(i, c)| Location::new(c.lat, c.lon, format!("city{}", i), "", "", "US"))
            .collect();
        let geocoder = Geocoder::from_locations(locations);
        geocoder.ensure_loaded();

        group.bench_with_input(BenchmarkId::new("single", size), &queries, |b, queries| {
            let mut i = 0;
            b.iter(|| {
                let q = queries[i % queries.len()];
                i += 1;
                geocoder.nearest(black_box(q)).map(|n| n.index)
            })
        });

        group.bench_with_input(BenchmarkId::new("batch_1000", size), &queries, |b, queries| {
            b.iter(|| geocoder.query(black_box(queries)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_nearest);
criterion_main!(benches);
