//! Synthesis pipeline benchmarks
//!
//! Measures tree construction, field evaluation at typical resolutions,
//! and program emission.
//!
//! Run with: cargo bench -p artgen-synth

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use artgen_synth::{build, emit, evaluate, BuildConfig, Grid, Interval, Registry};

fn bench_build(c: &mut Criterion) {
    let registry = Registry::standard();
    let config = BuildConfig::new(4, 10).unwrap();
    c.bench_function("build depth 4..10", |b| {
        let mut rng = Pcg32::seed_from_u64(1);
        b.iter(|| {
            let tree = build(&registry, &config, &mut rng).unwrap();
            black_box(tree)
        });
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let registry = Registry::standard();
    let config = BuildConfig::new(4, 8).unwrap();
    let tree = build(&registry, &config, &mut Pcg32::seed_from_u64(7)).unwrap();

    let mut group = c.benchmark_group("evaluate");
    for size in [64usize, 256] {
        let grid = Grid::new(size, size, Interval::new(-1.0, 1.0));
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| black_box(evaluate(&registry, &tree, grid).unwrap()));
        });
    }
    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let registry = Registry::standard();
    let config = BuildConfig::new(3, 7).unwrap();
    let tree = build(&registry, &config, &mut Pcg32::seed_from_u64(7)).unwrap();
    c.bench_function("emit depth 3..7", |b| {
        b.iter(|| black_box(emit(&tree).unwrap()));
    });
}

criterion_group!(benches, bench_build, bench_evaluate, bench_emit);
criterion_main!(benches);
