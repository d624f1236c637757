use chrono::{Duration, NaiveDate, TimeZone, Utc};
use readyrs::payload::PayloadBuilder;
use readyrs::readiness::{ReadinessCalculator, ReadinessInput};
use readyrs::sleep::SleepCalculator;
use readyrs::strain::{StrainCalculator, TrainingEffect};
use readyrs::{HeartRateSample, MetricField, RawDailyEntry};

/// End-to-end tests covering the complete scoring and payload workflows.

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + Duration::days(offset)
}

fn full_entry(date: NaiveDate) -> RawDailyEntry {
    RawDailyEntry {
        date,
        sleep_hours: Some(7.5),
        deep_sleep_hours: Some(1.7),
        rem_sleep_hours: Some(1.5),
        hrv_ms: Some(58.0),
        resting_hr: Some(51.0),
        vo2max: Some(47.0),
        steps: Some(10_500.0),
        active_calories: Some(650.0),
        training_load: Some(90.0),
        readiness_score: Some(78.0),
        weight_kg: Some(70.5),
        body_fat_percent: Some(14.0),
        workout_count: Some(1.0),
    }
}

/// Spec-style scenario: HRV above baseline clamps to 100, sleep with an
/// efficiency bonus caps at 100, and the weighted mean of two 100s is 100.
#[test]
fn test_readiness_hrv_and_sleep_only() {
    let input = ReadinessInput {
        hrv: Some(60.0),
        hrv_baseline_7d: Some(50.0),
        sleep_hours: Some(8.0),
        sleep_efficiency: Some(90.0),
        ..Default::default()
    };
    let result = ReadinessCalculator::calculate(&input);
    assert_eq!(result.score, 100);
    assert!(result.is_calculated);
}

/// Empty heart-rate samples yield a fully zeroed recovery result.
#[test]
fn test_strain_empty_samples() {
    let result = StrainCalculator::calculate(&[], 190.0);
    assert_eq!(result.score, 0.0);
    assert!(result.heart_rate_zones.is_empty());
    assert_eq!(result.peak_hr, None);
    assert_eq!(result.avg_hr, None);
    assert_eq!(result.duration_seconds, 0.0);
    assert_eq!(result.training_effect, TrainingEffect::Recovery);
}

/// A zero sleep reading is a sensor gap, not a true zero: it lands in
/// `missingFields` and is excluded from the weekly average.
#[test]
fn test_zero_sleep_is_missing_not_zero() {
    let mut entries: Vec<RawDailyEntry> = (0..7).map(|i| full_entry(day(i))).collect();
    entries[6].sleep_hours = Some(0.0);
    let payload = PayloadBuilder::build(&entries);

    let record = payload.daily_last14.last().unwrap();
    assert!(record.missing_fields.contains(&MetricField::SleepHours));
    assert!(!record.outlier_fields.contains(&MetricField::SleepHours));
    assert_eq!(payload.weekly_summary[0].avg_sleep_hours, Some(7.5));
}

/// Consecutive days with HRV 50 then 80 (a 60% jump) raise a sensor-error
/// flag naming the later date and the percentage.
#[test]
fn test_hrv_jump_raises_sensor_flag() {
    let mut entries = vec![full_entry(day(0)), full_entry(day(1))];
    entries[0].hrv_ms = Some(50.0);
    entries[1].hrv_ms = Some(80.0);
    let payload = PayloadBuilder::build(&entries);

    let flag = payload
        .data_quality_flags
        .iter()
        .find(|f| f.starts_with("POTENTIAL_SENSOR_ERROR: hrvMs"))
        .expect("expected a sensor-error flag");
    assert!(flag.contains("60.0%"));
    assert!(flag.contains("2024-05-02"));
}

/// Zero time in bed yields zero efficiency and zero awake time, with no
/// division performed.
#[test]
fn test_sleep_efficiency_zero_inputs() {
    let eff = SleepCalculator::efficiency(0.0, 0.0);
    assert_eq!(eff.percentage, 0.0);
    assert_eq!(eff.awake_time_hours, 0.0);
}

/// Building the payload twice from the same input yields byte-identical JSON.
#[test]
fn test_payload_idempotent_serialization() {
    let mut entries: Vec<RawDailyEntry> = (0..45).map(|i| full_entry(day(i))).collect();
    entries[10].hrv_ms = Some(f64::NAN);
    entries[20].steps = Some(95_000.0);
    entries[30].sleep_hours = None;

    let a = serde_json::to_string(&PayloadBuilder::build(&entries)).unwrap();
    let b = serde_json::to_string(&PayloadBuilder::build(&entries)).unwrap();
    assert_eq!(a, b);
}

/// The payload's wire commitments: camelCase field names, SCREAMING_SNAKE
/// quality labels, ISO-8601 dates, and a units dictionary.
#[test]
fn test_payload_wire_format() {
    let entries: Vec<RawDailyEntry> = (0..35).map(|i| full_entry(day(i))).collect();
    let payload = PayloadBuilder::build(&entries);
    let json = serde_json::to_value(&payload).unwrap();

    assert!(json.get("dateRange").is_some());
    assert!(json.get("weeklySummary").is_some());
    assert!(json.get("dailyLast14").is_some());
    assert!(json.get("coverageValidDays").is_some());
    assert!(json.get("dataQualityStatus").is_some());
    assert!(json.get("dataQualityFlags").is_some());
    assert!(json.get("dataReliabilityScore").is_some());
    assert!(json.get("totalDays").is_some());

    assert_eq!(json["dateRange"]["start"], "2024-05-01");
    assert_eq!(json["units"]["hrvMs"], "ms");
    assert_eq!(json["units"]["activeCalories"], "kcal");
    assert_eq!(json["dataQualityStatus"]["hrvMs"], "HIGH_CONFIDENCE_DATA");
    assert_eq!(json["weeklySummary"][0]["weekNumber"], 1);
    assert_eq!(json["weeklySummary"][0]["validDaysCount"], 7);
}

/// Payload JSON survives a deserialize round trip unchanged.
#[test]
fn test_payload_roundtrip() {
    let entries: Vec<RawDailyEntry> = (0..20).map(|i| full_entry(day(i))).collect();
    let payload = PayloadBuilder::build(&entries);

    let json = serde_json::to_string(&payload).unwrap();
    let back: readyrs::AnalysisPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(payload, back);
}

/// Feeding the payload's own aggregates into the score engine: the two
/// subsystems compose without any ordering dependency.
#[test]
fn test_payload_feeds_score_engine() {
    let entries: Vec<RawDailyEntry> = (0..30).map(|i| full_entry(day(i))).collect();
    let payload = PayloadBuilder::build(&entries);

    let week1 = &payload.weekly_summary[0];
    let latest = payload.daily_last14.last().unwrap();

    let input = ReadinessInput {
        hrv: latest.values.get(&MetricField::HrvMs).copied(),
        hrv_baseline_7d: week1.avg_hrv_ms,
        rhr: latest.values.get(&MetricField::RestingHr).copied(),
        rhr_baseline_7d: week1.avg_resting_hr,
        sleep_hours: latest.values.get(&MetricField::SleepHours).copied(),
        sleep_efficiency: None,
        previous_day_strain: None,
        data_source: Some("test-device".to_string()),
    };
    let readiness = ReadinessCalculator::calculate(&input);

    // steady data: HRV and RHR at baseline, sleep in the ideal band
    assert!(readiness.is_calculated);
    assert!(readiness.score >= 90, "score was {}", readiness.score);
    assert_eq!(readiness.data_source, "test-device");
}

/// A realistic workout sample stream produces consistent zone bookkeeping.
#[test]
fn test_strain_workout_stream() {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
    // 45 minutes: 15 easy, 20 threshold, 10 hard, sampled every 30s
    let samples: Vec<HeartRateSample> = (0..90)
        .map(|i| {
            let hr = if i < 30 {
                110.0
            } else if i < 70 {
                155.0
            } else {
                175.0
            };
            HeartRateSample::new(hr, start + Duration::seconds(i * 30))
        })
        .collect();

    let result = StrainCalculator::calculate(&samples, 190.0);

    assert_eq!(result.peak_hr, Some(175.0));
    assert!(result.normalized_score > 0.0 && result.normalized_score <= 10.0);
    let zone_total: f64 = result.heart_rate_zones.values().sum();
    assert!((zone_total - result.duration_seconds).abs() < 1e-9);
    // 89 gaps of 30s plus the fixed 60s for the final sample
    assert_eq!(result.duration_seconds, 89.0 * 30.0 + 60.0);
}
