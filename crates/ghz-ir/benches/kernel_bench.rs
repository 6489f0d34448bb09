//! Benchmarks for kernel construction
//!
//! Run with: cargo bench -p ghz-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ghz_ir::{Kernel, ghz_state};

fn bench_ghz_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_kernel");

    for num_qubits in &[3u32, 10, 34, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| black_box(ghz_state(black_box(n)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut kernel = Kernel::new("bench");
        let q = kernel.qalloc(10);
        b.iter(|| {
            kernel.h(black_box(q[0])).unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut kernel = Kernel::new("bench");
        let q = kernel.qalloc(10);
        b.iter(|| {
            kernel.cx(black_box(q[0]), black_box(q[1])).unwrap();
        });
    });

    group.finish();
}

fn bench_kernel_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_depth");

    for num_qubits in &[10u32, 34, 100] {
        let kernel = ghz_state(*num_qubits).unwrap();
        group.bench_with_input(
            BenchmarkId::new("depth", num_qubits),
            &kernel,
            |b, kernel| {
                b.iter(|| black_box(kernel.depth()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ghz_kernel,
    bench_gate_addition,
    bench_kernel_depth,
);

criterion_main!(benches);
