//! Data-quality payload builder.
//!
//! Turns an ordered history of raw daily entries into a single
//! quality-annotated, serializable payload: a rolling 14-day daily window with
//! per-field missing/outlier annotations, 13 fixed trailing weekly aggregates,
//! whole-history coverage counts, a categorical quality status per metric,
//! informational anomaly flags, and one overall reliability score.
//!
//! The build is a pure, stateless batch transform: the same input list always
//! produces byte-identical output. The history is sorted once by date and all
//! 13 weekly windows are located by binary search over the sorted order.

use crate::models::{DataQualityStatus, DateRange, MetricField, RawDailyEntry};
use crate::quality::DailyQualityRecord;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Number of trailing 7-day windows in the weekly summary.
const WEEK_COUNT: u8 = 13;

/// Maximum entries in the rolling daily window.
const DAILY_WINDOW: usize = 14;

/// Coverage below this count flags a metric as insufficient.
const MIN_COVERAGE: usize = 5;

/// Consecutive fully-gapped days before a gap warning fires.
const GAP_RUN_LENGTH: usize = 5;

/// Day-over-day HRV change (percent of prior value) treated as a suspected
/// sensor error.
const HRV_JUMP_PCT: f64 = 40.0;

/// Day-over-day resting-HR change treated as a suspected sensor error.
const RHR_JUMP_PCT: f64 = 30.0;

/// Reliability blend weights over the key metrics.
const RELIABILITY_WEIGHTS: [(MetricField, f64); 8] = [
    (MetricField::SleepHours, 0.25),
    (MetricField::HrvMs, 0.20),
    (MetricField::RestingHr, 0.15),
    (MetricField::Steps, 0.15),
    (MetricField::ActiveCalories, 0.10),
    (MetricField::Vo2max, 0.05),
    (MetricField::WeightKg, 0.05),
    (MetricField::BodyFatPercent, 0.05),
];

/// Errors detectable at the ingestion boundary.
///
/// The builder itself assumes a date-unique history (the ingestion layer owns
/// deduplication); [`validate_history`] gives that layer a canonical check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("duplicate entry for date {date}")]
    DuplicateDate { date: NaiveDate },
}

/// Check the precondition the builder assumes: no two entries share a date.
pub fn validate_history(entries: &[RawDailyEntry]) -> Result<(), HistoryError> {
    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort_unstable();
    for pair in dates.windows(2) {
        if pair[0] == pair[1] {
            return Err(HistoryError::DuplicateDate { date: pair[0] });
        }
    }
    Ok(())
}

/// One 7-day aggregation window. Week 1 ends at the dataset's last date;
/// week 13 is twelve weeks earlier.
///
/// Averages and totals use only in-range, non-missing values; an empty window
/// carries all-`None` aggregates and a zero valid-day count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAggregate {
    /// 1 (most recent) through 13.
    pub week_number: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub avg_sleep_hours: Option<f64>,
    pub avg_deep_sleep_hours: Option<f64>,
    pub avg_rem_sleep_hours: Option<f64>,
    pub avg_hrv_ms: Option<f64>,
    pub avg_resting_hr: Option<f64>,
    pub avg_vo2max: Option<f64>,
    pub avg_steps: Option<f64>,
    pub avg_training_load: Option<f64>,
    pub avg_readiness_score: Option<f64>,
    pub avg_weight_kg: Option<f64>,
    pub avg_body_fat_percent: Option<f64>,
    /// Energy aggregates as a weekly total, not an average.
    pub total_active_calories: Option<f64>,
    /// Workout counts aggregate as a weekly total.
    pub total_workouts: Option<f64>,
    /// Days in the window with at least one of sleep, HRV, steps, or active
    /// calories present (post-normalization, pre-outlier-filter).
    pub valid_days_count: usize,
}

/// The quality-annotated analysis payload, built once per request from the
/// full daily history. Directly serializable; dates go out as `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    /// First and last entry dates in the history.
    pub date_range: DateRange,
    /// Unit string per metric field.
    pub units: BTreeMap<MetricField, String>,
    /// Fixed 13-slot weekly summary, week 1 first. Empty only for an empty
    /// history.
    pub weekly_summary: Vec<WeeklyAggregate>,
    /// Up to the last 14 daily records, chronological.
    pub daily_last14: Vec<DailyQualityRecord>,
    /// Whole-history count of valid (in-range, non-missing) days per metric.
    pub coverage_valid_days: BTreeMap<MetricField, usize>,
    /// Categorical quality label per metric, from its coverage count.
    pub data_quality_status: BTreeMap<MetricField, DataQualityStatus>,
    /// Informational anomaly warnings; never fatal.
    pub data_quality_flags: Vec<String>,
    /// Weighted coverage-ratio blend, 0-100.
    pub data_reliability_score: u8,
    /// Number of entries in the history.
    pub total_days: usize,
}

/// Payload construction engine.
pub struct PayloadBuilder;

impl PayloadBuilder {
    /// Build the full quality-annotated payload from a raw daily history.
    ///
    /// Entries need not be pre-sorted; they are sorted by date here. Dates
    /// must be unique (see [`validate_history`]). An empty history yields an
    /// empty payload with reliability 0.
    pub fn build(entries: &[RawDailyEntry]) -> AnalysisPayload {
        let mut sorted: Vec<RawDailyEntry> = entries.to_vec();
        sorted.sort_by_key(|e| e.date);

        let records: Vec<DailyQualityRecord> =
            sorted.iter().map(DailyQualityRecord::from_entry).collect();
        let total_days = records.len();

        tracing::debug!(total_days, "building analysis payload");

        let units: BTreeMap<MetricField, String> = MetricField::ALL
            .iter()
            .map(|f| (*f, f.unit().to_string()))
            .collect();

        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return AnalysisPayload {
                // epoch placeholder; an empty history has no real range
                date_range: DateRange {
                    start: NaiveDate::default(),
                    end: NaiveDate::default(),
                },
                units,
                weekly_summary: Vec::new(),
                daily_last14: Vec::new(),
                coverage_valid_days: BTreeMap::new(),
                data_quality_status: BTreeMap::new(),
                data_quality_flags: Vec::new(),
                data_reliability_score: 0,
                total_days: 0,
            };
        };

        let date_range = DateRange {
            start: first.date,
            end: last.date,
        };

        let daily_last14: Vec<DailyQualityRecord> = records
            .iter()
            .skip(total_days.saturating_sub(DAILY_WINDOW))
            .cloned()
            .collect();

        let weekly_summary = Self::weekly_summary(&records, last.date);
        let coverage_valid_days = Self::coverage(&records);
        let data_quality_status: BTreeMap<MetricField, DataQualityStatus> = coverage_valid_days
            .iter()
            .map(|(f, count)| (*f, DataQualityStatus::from_coverage(*count)))
            .collect();
        let data_quality_flags = Self::anomaly_flags(&records, &coverage_valid_days);
        let data_reliability_score = Self::reliability_score(&coverage_valid_days, total_days);

        AnalysisPayload {
            date_range,
            units,
            weekly_summary,
            daily_last14,
            coverage_valid_days,
            data_quality_status,
            data_quality_flags,
            data_reliability_score,
            total_days,
        }
    }

    /// The 13 trailing weekly aggregates, week 1 ending at `last_date`.
    fn weekly_summary(records: &[DailyQualityRecord], last_date: NaiveDate) -> Vec<WeeklyAggregate> {
        (1..=WEEK_COUNT)
            .map(|week| {
                let end = last_date - Duration::days(7 * (week as i64 - 1));
                let start = end - Duration::days(6);

                // records are sorted by date, so the window is a contiguous slice
                let lo = records.partition_point(|r| r.date < start);
                let hi = records.partition_point(|r| r.date <= end);
                Self::aggregate_window(week, start, end, &records[lo..hi])
            })
            .collect()
    }

    fn aggregate_window(
        week_number: u8,
        start_date: NaiveDate,
        end_date: NaiveDate,
        window: &[DailyQualityRecord],
    ) -> WeeklyAggregate {
        let valid_days_count = window
            .iter()
            .filter(|r| {
                [
                    MetricField::SleepHours,
                    MetricField::HrvMs,
                    MetricField::Steps,
                    MetricField::ActiveCalories,
                ]
                .iter()
                .any(|f| r.status(*f).normalized().is_some())
            })
            .count();

        WeeklyAggregate {
            week_number,
            start_date,
            end_date,
            avg_sleep_hours: Self::window_mean(window, MetricField::SleepHours),
            avg_deep_sleep_hours: Self::window_mean(window, MetricField::DeepSleepHours),
            avg_rem_sleep_hours: Self::window_mean(window, MetricField::RemSleepHours),
            avg_hrv_ms: Self::window_mean(window, MetricField::HrvMs),
            avg_resting_hr: Self::window_mean(window, MetricField::RestingHr),
            avg_vo2max: Self::window_mean(window, MetricField::Vo2max),
            avg_steps: Self::window_mean(window, MetricField::Steps),
            avg_training_load: Self::window_mean(window, MetricField::TrainingLoad),
            avg_readiness_score: Self::window_mean(window, MetricField::ReadinessScore),
            avg_weight_kg: Self::window_mean(window, MetricField::WeightKg),
            avg_body_fat_percent: Self::window_mean(window, MetricField::BodyFatPercent),
            total_active_calories: Self::window_sum(window, MetricField::ActiveCalories),
            total_workouts: Self::window_sum(window, MetricField::WorkoutCount),
            valid_days_count,
        }
    }

    /// Mean over in-range, non-missing values; `None` when no day qualifies.
    fn window_mean(window: &[DailyQualityRecord], field: MetricField) -> Option<f64> {
        let values: Vec<f64> = window
            .iter()
            .filter_map(|r| r.status(field).in_range())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Sum over in-range, non-missing values; `None` when no day qualifies.
    fn window_sum(window: &[DailyQualityRecord], field: MetricField) -> Option<f64> {
        let values: Vec<f64> = window
            .iter()
            .filter_map(|r| r.status(field).in_range())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum())
        }
    }

    /// Whole-history coverage: days with a valid, in-range value, per metric
    /// of the fixed coverage set.
    fn coverage(records: &[DailyQualityRecord]) -> BTreeMap<MetricField, usize> {
        MetricField::COVERAGE_SET
            .iter()
            .map(|field| {
                let count = records
                    .iter()
                    .filter(|r| r.status(*field).in_range().is_some())
                    .count();
                (*field, count)
            })
            .collect()
    }

    /// Informational anomaly warnings: data gaps, insufficient coverage, and
    /// suspected sensor glitches.
    fn anomaly_flags(
        records: &[DailyQualityRecord],
        coverage: &BTreeMap<MetricField, usize>,
    ) -> Vec<String> {
        let mut flags = Vec::new();

        // (a) first run of 5 consecutive recorded days lacking sleep, HRV,
        // and steps simultaneously
        let mut run_start: Option<NaiveDate> = None;
        let mut run_len = 0usize;
        for record in records {
            let all_gapped = [MetricField::SleepHours, MetricField::HrvMs, MetricField::Steps]
                .iter()
                .all(|f| record.status(*f).normalized().is_none());
            if all_gapped {
                if run_len == 0 {
                    run_start = Some(record.date);
                }
                run_len += 1;
                if run_len == GAP_RUN_LENGTH {
                    if let Some(start) = run_start {
                        flags.push(format!(
                            "DATA_GAP: {GAP_RUN_LENGTH} consecutive days without sleep, HRV, or steps data starting {start}"
                        ));
                    }
                    break;
                }
            } else {
                run_len = 0;
                run_start = None;
            }
        }

        // (b) insufficient coverage per metric
        for (field, count) in coverage {
            if *count < MIN_COVERAGE {
                flags.push(format!(
                    "INSUFFICIENT_DATA: {field} has {count} valid days (minimum {MIN_COVERAGE})"
                ));
            }
        }

        // (c) suspected sensor errors on day-over-day jumps. Compares
        // normalized values before outlier filtering: an implausible reading
        // is exactly the glitch being hunted.
        for pair in records.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            if curr.date - prev.date != Duration::days(1) {
                continue;
            }
            for (field, threshold) in [
                (MetricField::HrvMs, HRV_JUMP_PCT),
                (MetricField::RestingHr, RHR_JUMP_PCT),
            ] {
                if let (Some(a), Some(b)) = (
                    prev.status(field).normalized(),
                    curr.status(field).normalized(),
                ) {
                    let pct = ((b - a) / a).abs() * 100.0;
                    if pct > threshold {
                        tracing::warn!(
                            field = %field,
                            date = %curr.date,
                            change_pct = pct,
                            "suspected sensor error"
                        );
                        flags.push(format!(
                            "POTENTIAL_SENSOR_ERROR: {field} changed {pct:.1}% day-over-day on {}",
                            curr.date
                        ));
                    }
                }
            }
        }

        flags
    }

    /// Weighted coverage-ratio blend over the key metrics, 0-100.
    fn reliability_score(coverage: &BTreeMap<MetricField, usize>, total_days: usize) -> u8 {
        if total_days == 0 {
            return 0;
        }

        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for (field, weight) in RELIABILITY_WEIGHTS {
            let ratio = coverage.get(&field).copied().unwrap_or(0) as f64 / total_days as f64;
            weighted_sum += ratio * weight;
            total_weight += weight;
        }

        (100.0 * weighted_sum / total_weight)
            .round()
            .clamp(0.0, 100.0) as u8
    }
}
