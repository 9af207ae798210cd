//! Benchmarks for the scoring hot path: one `criterion_group` over the
//! functions actually on the per-event path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vitals_baseline::BaselineStats;
use vitals_scorer::scoring::{score_overall, score_vital};

fn bench_score_vital_cold_start(c: &mut Criterion) {
    c.bench_function("score_vital_cold_start", |b| {
        b.iter(|| score_vital(black_box("heart_rate"), black_box(180.0), black_box(None), black_box(3)));
    });
}

fn bench_score_vital_against_baseline(c: &mut Criterion) {
    let stats = BaselineStats { mean: 75.0, stddev: 8.0, count: 120 };
    c.bench_function("score_vital_against_baseline", |b| {
        b.iter(|| score_vital(black_box("heart_rate"), black_box(132.0), black_box(Some(stats)), black_box(120)));
    });
}

fn bench_score_overall(c: &mut Criterion) {
    c.bench_function("score_overall", |b| {
        b.iter(|| score_overall(black_box(Some(0.6)), black_box(Some(0.3)), black_box(Some(0.1))));
    });
}

criterion_group!(benches, bench_score_vital_cold_start, bench_score_vital_against_baseline, bench_score_overall);
criterion_main!(benches);
