use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vm_sim::metrics::sample_series;
use vm_sim::models::PowerState;

const VM: &str = "bench-sub/bench-rg/bench-vm";

fn bench_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics_series");
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let last_start = Some(start - Duration::seconds(30));

    for (label, span, step) in [
        ("15m@60s", Duration::minutes(15), Duration::seconds(60)),
        ("1d@5m", Duration::days(1), Duration::seconds(300)),
        ("90d@15m", Duration::days(90), Duration::seconds(900)),
    ] {
        group.bench_with_input(BenchmarkId::new("collect", label), &span, |b, span| {
            b.iter(|| {
                let series = sample_series(
                    VM,
                    PowerState::Running,
                    last_start,
                    start,
                    start + *span,
                    step,
                )
                .expect("window is valid");
                black_box(series.collect::<Vec<_>>());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_series);
criterion_main!(benches);
