//! Postorder Traversal Benchmark
//!
//! Traversal and differentiation cost on heavily shared DAGs, on long chains
//! and on a wide polynomial built without sharing.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::convert::Infallible;
use std::hint::black_box;
use symb_dag::{Diff, Expr, gradient, postorder};

// =============================================================================
// Expression Generators
// =============================================================================

/// x, x + x, (x + x) * (x + x), ... alternating operators, every level shared
fn doubling_chain(levels: usize) -> Expr {
    let mut expr = Expr::symbol("x");
    for i in 0..levels {
        expr = if i % 2 == 0 { &expr + &expr } else { &expr * &expr };
    }
    expr
}

/// ((x + 1) * 2 + 3) * 4 ... with no sharing at all
fn linear_chain(len: usize) -> Expr {
    let mut expr = Expr::symbol("x");
    for i in 0..len {
        let constant = f64::from(u32::try_from(i % 97).unwrap_or(0));
        expr = if i % 2 == 0 { expr + constant } else { expr * constant };
    }
    expr
}

/// Sum of c_i * x^i * y terms
fn polynomial(terms: usize) -> Expr {
    let x = Expr::symbol("x");
    let y = Expr::symbol("y");
    let mut expr = Expr::number(0.0);
    for i in 1..=terms {
        let exponent = f64::from(u32::try_from(i).unwrap_or(u32::MAX));
        expr = expr + exponent * x.clone().pow(exponent) * &y;
    }
    expr
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("postorder");

    for levels in [16usize, 64, 256] {
        let expr = doubling_chain(levels);
        group.bench_with_input(BenchmarkId::new("doubling_count", levels), &expr, |b, e| {
            b.iter(|| black_box(e).node_count())
        });
    }

    let chain = linear_chain(10_000);
    group.bench_function("linear_chain_10k_count", |b| {
        b.iter(|| {
            let mut n = 0usize;
            let _ = postorder(black_box(&chain), |_, _: &[&()]| {
                n += 1;
                Ok::<_, Infallible>(())
            });
            n
        })
    });

    group.finish();
}

fn bench_differentiation(c: &mut Criterion) {
    let mut group = c.benchmark_group("differentiate");
    group.sample_size(20);

    let shared = doubling_chain(256);
    group.bench_function("doubling_256", |b| {
        b.iter(|| Diff::new().differentiate_by_name(black_box(&shared), "x"))
    });

    let chain = linear_chain(10_000);
    group.bench_function("linear_chain_10k", |b| {
        b.iter(|| Diff::new().differentiate_by_name(black_box(&chain), "x"))
    });

    let poly = polynomial(300);
    group.bench_function("polynomial_300_gradient", |b| {
        b.iter(|| gradient(black_box(&poly), &["x", "y"]))
    });

    group.finish();
}

criterion_group!(benches, bench_traversal, bench_differentiation);
criterion_main!(benches);
