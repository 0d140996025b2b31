// ============================================================================
// Arithmetic Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Addition - Operands far apart in magnitude
// 2. Division - Quotients at increasing precision
// 3. Transcendental - ln, exp and square root
// 4. Binary - Radix-2 arithmetic against hardware doubles
// ============================================================================

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use radix_math::prelude::*;
use std::hint::black_box;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

// ============================================================================
// Addition Benchmarks
// ============================================================================

fn benchmark_add_exponent_gap(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_exponent_gap");
    let ctx = PrecisionContext::for_precision(16);
    let small = dec("1.234567");

    // Bounded precision collapses the far operand, so large gaps stay cheap
    for gap in [10u32, 1_000, 100_000].iter() {
        let large = Decimal::new(1, *gap);
        group.bench_with_input(BenchmarkId::new("prec16", gap), &large, |b, large| {
            b.iter(|| black_box(large.add(&small, Some(&ctx)).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Division Benchmarks
// ============================================================================

fn benchmark_division(c: &mut Criterion) {
    let mut group = c.benchmark_group("division");
    let one = Decimal::one();
    let seven = Decimal::from(7);

    for precision in [9u64, 34, 100, 1_000].iter() {
        let ctx = PrecisionContext::for_precision(*precision);
        group.bench_with_input(BenchmarkId::new("one_seventh", precision), &ctx, |b, ctx| {
            b.iter(|| black_box(one.divide(&seven, Some(ctx)).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Transcendental Benchmarks
// ============================================================================

fn benchmark_transcendental(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcendental");
    let two = Decimal::from(2);

    for precision in [16u64, 34, 100].iter() {
        let ctx = PrecisionContext::for_precision(*precision);
        group.bench_with_input(BenchmarkId::new("ln", precision), &ctx, |b, ctx| {
            b.iter(|| black_box(two.ln(Some(ctx)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("exp", precision), &ctx, |b, ctx| {
            b.iter(|| black_box(two.exp(Some(ctx)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("square_root", precision), &ctx, |b, ctx| {
            b.iter(|| black_box(two.square_root(Some(ctx)).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Binary Benchmarks
// ============================================================================

fn benchmark_binary64(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary64");
    let ctx = PrecisionContext::binary64();
    let a = BinaryFloat::from_f64(std::f64::consts::PI);
    let b = BinaryFloat::from_f64(1.0e-3);

    group.bench_function("multiply", |bench| {
        bench.iter(|| black_box(a.multiply(&b, Some(&ctx)).unwrap()));
    });
    group.bench_function("divide", |bench| {
        bench.iter(|| black_box(a.divide(&b, Some(&ctx)).unwrap()));
    });
    group.bench_function("to_f64", |bench| {
        bench.iter(|| black_box(a.to_f64()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_add_exponent_gap,
    benchmark_division,
    benchmark_transcendental,
    benchmark_binary64
);
criterion_main!(benches);
