//! Currency formatting performance benchmarks

use coinpulse::{format_currency, FormatOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_standard(c: &mut Criterion) {
    let options = FormatOptions::default();
    let mut group = c.benchmark_group("format_standard");

    for value in [0.0, 1234.5, 67_250.456, 0.000_012_3, 9.99e15] {
        group.bench_with_input(BenchmarkId::from_parameter(value), &value, |b, &value| {
            b.iter(|| format_currency(black_box(value), &options))
        });
    }

    group.finish();
}

fn bench_compact(c: &mut Criterion) {
    let options = FormatOptions::default().with_compact(true);
    let mut group = c.benchmark_group("format_compact");

    for value in [999.7, 1_250.0, 2_340_000_000.0, 7.1e12] {
        group.bench_with_input(BenchmarkId::from_parameter(value), &value, |b, &value| {
            b.iter(|| format_currency(black_box(value), &options))
        });
    }

    group.finish();
}

fn bench_string_input(c: &mut Criterion) {
    let options = FormatOptions::default().with_currency("EUR").with_locale("de-DE");

    c.bench_function("format_string_de", |b| {
        b.iter(|| format_currency(black_box("1234.5678"), &options))
    });
}

criterion_group!(benches, bench_standard, bench_compact, bench_string_input);
criterion_main!(benches);
