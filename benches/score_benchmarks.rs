use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use readyrs::payload::PayloadBuilder;
use readyrs::readiness::{ReadinessCalculator, ReadinessInput};
use readyrs::strain::StrainCalculator;
use readyrs::{HeartRateSample, RawDailyEntry};

/// Benchmarks for the scoring and payload-building core with varying
/// history and sample sizes.

fn create_history(days: usize) -> Vec<RawDailyEntry> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..days)
        .map(|i| {
            let mut entry = RawDailyEntry::new(start + Duration::days(i as i64));
            entry.sleep_hours = Some(6.5 + (i % 4) as f64 * 0.5);
            entry.hrv_ms = Some(45.0 + (i % 20) as f64);
            entry.resting_hr = Some(50.0 + (i % 8) as f64);
            entry.steps = Some(6_000.0 + (i % 10) as f64 * 800.0);
            entry.active_calories = Some(400.0 + (i % 6) as f64 * 90.0);
            // every seventh day is an unsynced gap
            if i % 7 == 6 {
                entry.sleep_hours = Some(0.0);
                entry.hrv_ms = None;
                entry.steps = Some(0.0);
            }
            entry
        })
        .collect()
}

fn create_hr_stream(count: usize) -> Vec<HeartRateSample> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let hr = 110.0 + ((i * 13) % 70) as f64;
            HeartRateSample::new(hr, start + Duration::seconds(i as i64 * 15))
        })
        .collect()
}

fn bench_payload_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Payload Build");

    for &days in &[7, 30, 90, 365] {
        let history = create_history(days);

        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::new("build", days), &history, |b, history| {
            b.iter(|| PayloadBuilder::build(black_box(history)));
        });
    }

    group.finish();
}

fn bench_strain_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Strain Calculation");

    for &samples in &[60, 600, 3600] {
        let stream = create_hr_stream(samples);

        group.throughput(Throughput::Elements(samples as u64));
        group.bench_with_input(BenchmarkId::new("calculate", samples), &stream, |b, stream| {
            b.iter(|| StrainCalculator::calculate(black_box(stream), 190.0));
        });
    }

    group.finish();
}

fn bench_readiness_calculation(c: &mut Criterion) {
    let input = ReadinessInput {
        hrv: Some(55.0),
        hrv_baseline_7d: Some(50.0),
        rhr: Some(52.0),
        rhr_baseline_7d: Some(54.0),
        sleep_hours: Some(7.4),
        sleep_efficiency: Some(91.0),
        previous_day_strain: Some(6.5),
        data_source: None,
    };

    c.bench_function("readiness_calculate", |b| {
        b.iter(|| ReadinessCalculator::calculate(black_box(&input)));
    });
}

criterion_group!(
    benches,
    bench_payload_build,
    bench_strain_calculation,
    bench_readiness_calculation
);
criterion_main!(benches);
