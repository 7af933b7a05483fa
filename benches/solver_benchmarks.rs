//! Criterion benchmarks for the water-inspired solvers.
//!
//! These benchmarks measure performance across problem sizes and
//! algorithms for scientific reproducibility.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use riego_tsp::{CostGraph, HcaSolver, IwdSolver, TourSolver, WaterFlowSolver};

/// Create a deterministic pseudo-random instance with n nodes
fn random_graph(n: usize, seed: u64) -> CostGraph {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut coords = Vec::with_capacity(n);
    for i in 0..n {
        let mut hasher = DefaultHasher::new();
        (seed, i, "x").hash(&mut hasher);
        let x = (hasher.finish() % 10000) as f64 / 100.0;

        let mut hasher = DefaultHasher::new();
        (seed, i, "y").hash(&mut hasher);
        let y = (hasher.finish() % 10000) as f64 / 100.0;

        coords.push((x, y));
    }
    CostGraph::from_coords(&format!("random_{n}"), &coords).expect("should create")
}

fn bench_hca(c: &mut Criterion) {
    let mut group = c.benchmark_group("HCA");

    for size in [10, 20, 50].iter() {
        let graph = random_graph(*size, 42);

        group.bench_with_input(BenchmarkId::new("nodes", size), size, |b, _| {
            b.iter(|| {
                let mut solver = HcaSolver::new().with_seed(42).with_cycle_cap(10);
                solver.solve(black_box(&graph)).expect("should solve")
            });
        });
    }

    group.finish();
}

fn bench_iwd(c: &mut Criterion) {
    let mut group = c.benchmark_group("IWD");

    for size in [10, 20, 50].iter() {
        let graph = random_graph(*size, 42);

        group.bench_with_input(BenchmarkId::new("nodes", size), size, |b, _| {
            b.iter(|| {
                let mut solver = IwdSolver::new().with_seed(42).with_iterations(10);
                solver.solve(black_box(&graph)).expect("should solve")
            });
        });
    }

    group.finish();
}

fn bench_wfa(c: &mut Criterion) {
    let mut group = c.benchmark_group("WFA");

    for size in [10, 20, 50].iter() {
        let graph = random_graph(*size, 42);

        group.bench_with_input(BenchmarkId::new("nodes", size), size, |b, _| {
            b.iter(|| {
                let mut solver = WaterFlowSolver::new().with_seed(42);
                solver.solve(black_box(&graph)).expect("should solve")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hca, bench_iwd, bench_wfa);
criterion_main!(benches);
