//! Criterion benchmarks for the trapezium adjuster and figure builder.
//! Results: by default under target/criterion.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trapezium::api::{adjust_trapezoid, SamplerCfg, Scenario, ScenarioStream};

fn sampled(n: usize, seed: u64) -> Vec<Scenario> {
    ScenarioStream::new(SamplerCfg::default(), seed)
        .expect("default sampler cfg is valid")
        .take(n)
        .map(|(s, _)| s)
        .collect()
}

fn bench_adjust(c: &mut Criterion) {
    let scenarios = sampled(1024, 43);
    let mut group = c.benchmark_group("trapezium");
    group.bench_function("adjust_trapezoid_1024", |b| {
        b.iter(|| {
            for s in &scenarios {
                black_box(adjust_trapezoid(&s.original(), s.candidate(), s.cfg()));
            }
        })
    });
    group.bench_function("evaluate_with_figure_1024", |b| {
        b.iter(|| {
            for s in &scenarios {
                let _ = black_box(s.evaluate());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_adjust);
criterion_main!(benches);
