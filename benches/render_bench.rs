//! Benchmarks for chart rendering
//!
//! Run with: cargo bench

use aqi_dashboard::model::{HistoricalPoint, HistoricalSeries};
use aqi_dashboard::render::{ChartLayout, SvgChart, TextChart, TimeFormatter};
use chrono::DateTime;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn create_series(count: usize) -> HistoricalSeries {
    let start = 1_700_000_000_000i64;
    (0..count)
        .map(|i| {
            let ts = DateTime::from_timestamp_millis(start + i as i64 * 3_600_000).unwrap();
            let value = 50.0 + 30.0 * ((i as f64 * std::f64::consts::PI / 12.0).sin());
            HistoricalPoint::new(ts, value)
        })
        .collect::<Vec<_>>()
        .into()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for size in [168, 10_000] {
        let series = create_series(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("layout_{}", size), |b| {
            b.iter(|| ChartLayout::new(black_box(&series)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let formatter = TimeFormatter::default();
    let text = TextChart::new(72, 16);
    let svg = SvgChart::default();

    for size in [168, 10_000] {
        let series = create_series(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("text_{}", size), |b| {
            b.iter(|| text.render(black_box(&series), &formatter))
        });

        group.bench_function(format!("svg_{}", size), |b| {
            b.iter(|| svg.render(black_box(&series), &formatter))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
