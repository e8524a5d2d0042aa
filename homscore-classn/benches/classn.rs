use criterion::{black_box, criterion_group, criterion_main, Criterion};
use homscore_classn::{
    area_under_roc_curve, ConfusionMatrixSequence, NamedScoreSeries, RateStatistic,
    ScoredInstance,
};

fn random_series(n: usize, seed: u64) -> NamedScoreSeries {
    let mut state = seed;
    let values = (0..n)
        .map(|i| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let score = (state >> 11) as f64 / (1u64 << 53) as f64;
            ScoredInstance::new(score, (state >> 7) & 1 == 1, format!("pair{}", i))
        })
        .collect();
    NamedScoreSeries::from_values("random", true, values)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("series");

    group.bench_function("from_values_100k", |b| {
        b.iter(|| random_series(black_box(100_000), 42))
    });

    let series = random_series(100_000, 42);
    group.bench_function("sweep_100k", |b| {
        b.iter(|| ConfusionMatrixSequence::build(black_box(&series)))
    });

    group.finish();
}

fn bench_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("curves");

    let seq = ConfusionMatrixSequence::build(&random_series(100_000, 7));
    group.bench_function("roc_auc_100k", |b| {
        b.iter(|| area_under_roc_curve(black_box(&seq)))
    });
    group.bench_function("precision_100k", |b| {
        b.iter(|| {
            seq.iter()
                .map(|m| RateStatistic::Precision.calculate(black_box(m)))
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_curves);
criterion_main!(benches);
