//! Benchmarks for tomography circuit generation
//!
//! Run with: cargo bench -p pairtomo-tomography

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pairtomo_ir::Circuit;
use pairtomo_tomography::{
    QubitSelector, generate_pairwise_tomography_variants, measurement_settings,
    verify_pairwise_coverage,
};

/// Benchmark basis assignment alone
fn bench_measurement_settings(c: &mut Criterion) {
    let mut group = c.benchmark_group("measurement_settings");

    for n in &[2usize, 9, 27, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter(|| measurement_settings(black_box(n)));
        });
    }

    group.finish();
}

/// Benchmark full circuit generation on GHZ preparations
fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_variants");

    for n in &[2u32, 5, 10, 20, 50] {
        let base = Circuit::ghz(*n).unwrap();
        group.bench_with_input(BenchmarkId::new("ghz", n), &base, |b, base| {
            b.iter(|| {
                generate_pairwise_tomography_variants(black_box(base), &QubitSelector::All).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark coverage verification of generated circuits
fn bench_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_coverage");

    for n in &[5u32, 20, 50] {
        let base = Circuit::ghz(*n).unwrap();
        let variants = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap();
        group.bench_with_input(BenchmarkId::new("ghz", n), &variants, |b, variants| {
            b.iter(|| verify_pairwise_coverage(black_box(variants)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_measurement_settings,
    bench_generation,
    bench_coverage
);
criterion_main!(benches);
