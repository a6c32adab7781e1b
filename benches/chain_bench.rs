//! Benchmarks for compiling and evaluating comprehensions.
//!
//! Compares compiled chains against hand-written `flat_map` chains over the
//! same list values, and measures compilation on its own.

use std::hint::black_box;

use bindchain::prelude::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{Term, int, source, sum};

static NAMES: [&str; 16] = [
    "g0", "g1", "g2", "g3", "g4", "g5", "g6", "g7", "g8", "g9", "g10", "g11", "g12", "g13",
    "g14", "g15",
];

fn deep_sequence(depth: usize) -> ClauseSequence<Term> {
    let mut builder = ClauseSequence::builder();
    for name in &NAMES[..depth] {
        builder = builder.bind(*name, source(Term::just_int(1)));
    }
    builder
        .build()
        .expect("benchmark sequences are well formed")
}

// =============================================================================
// Compilation
// =============================================================================

fn benchmark_compile(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compile");

    for depth in [1, 4, 16] {
        let sequence = deep_sequence(depth);
        let names = &NAMES[..depth];
        group.bench_with_input(BenchmarkId::new("generators", depth), &sequence, |bencher, sequence| {
            bencher.iter(|| black_box(compile(sequence.clone(), sum(names))));
        });
    }

    group.finish();
}

// =============================================================================
// Option-like chains
// =============================================================================

fn benchmark_maybe_chain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("maybe_chain");

    for depth in [1, 4, 16] {
        let chain = compile(deep_sequence(depth), sum(&NAMES[..depth]))
            .expect("benchmark sequences compile");
        group.bench_with_input(BenchmarkId::new("evaluate", depth), &chain, |bencher, chain| {
            bencher.iter(|| black_box(evaluate(chain)));
        });
    }

    group.finish();
}

// =============================================================================
// Nested list comprehension
// =============================================================================

fn benchmark_nested_lists(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("nested_lists");

    for size in [10_i64, 50] {
        let values: Vec<i64> = (0..size).collect();
        let sequence = ClauseSequence::builder()
            .bind("x", source(Term::ints(&values)))
            .guard(Expression::new(["x"], |scope| Ok(int(scope, "x")? % 2 == 0)))
            .bind("y", source(Term::ints(&values)))
            .build()
            .expect("benchmark sequences are well formed");
        let chain = compile(sequence, sum(&["x", "y"])).expect("benchmark sequences compile");

        group.bench_with_input(BenchmarkId::new("chain", size), &chain, |bencher, chain| {
            bencher.iter(|| black_box(evaluate(chain)));
        });

        group.bench_with_input(BenchmarkId::new("flat_map", size), &values, |bencher, values| {
            bencher.iter(|| {
                let result: Vec<i64> = values
                    .iter()
                    .filter(|x| *x % 2 == 0)
                    .flat_map(|x| values.iter().map(move |y| x + y))
                    .collect();
                black_box(result)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_compile,
    benchmark_maybe_chain,
    benchmark_nested_lists
);
criterion_main!(benches);
