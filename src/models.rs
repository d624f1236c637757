//! Core value objects shared across the scoring and data-quality pipeline.
//!
//! Everything here is an immutable, serializable value: raw daily entries come
//! in from an external ingestion layer, and the calculators in the other
//! modules project them into scores and quality-annotated payloads. Dates are
//! calendar days (`NaiveDate`, serialized as `yyyy-MM-dd`); instants use UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the daily physiological metrics tracked by the system.
///
/// Serialized in camelCase (`sleepHours`, `hrvMs`, ...) to match the payload's
/// wire format. Declaration order defines the `Ord` used for deterministic
/// map/set serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    SleepHours,
    DeepSleepHours,
    RemSleepHours,
    HrvMs,
    RestingHr,
    Vo2max,
    Steps,
    ActiveCalories,
    TrainingLoad,
    ReadinessScore,
    WeightKg,
    BodyFatPercent,
    WorkoutCount,
}

impl MetricField {
    /// Every tracked metric, in serialization order.
    pub const ALL: [MetricField; 13] = [
        MetricField::SleepHours,
        MetricField::DeepSleepHours,
        MetricField::RemSleepHours,
        MetricField::HrvMs,
        MetricField::RestingHr,
        MetricField::Vo2max,
        MetricField::Steps,
        MetricField::ActiveCalories,
        MetricField::TrainingLoad,
        MetricField::ReadinessScore,
        MetricField::WeightKg,
        MetricField::BodyFatPercent,
        MetricField::WorkoutCount,
    ];

    /// The fixed metric set used for coverage counting and quality status.
    pub const COVERAGE_SET: [MetricField; 10] = [
        MetricField::SleepHours,
        MetricField::HrvMs,
        MetricField::RestingHr,
        MetricField::Vo2max,
        MetricField::Steps,
        MetricField::ActiveCalories,
        MetricField::TrainingLoad,
        MetricField::ReadinessScore,
        MetricField::WeightKg,
        MetricField::BodyFatPercent,
    ];

    /// Wire name of the field (camelCase, identical to the serde form).
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::SleepHours => "sleepHours",
            MetricField::DeepSleepHours => "deepSleepHours",
            MetricField::RemSleepHours => "remSleepHours",
            MetricField::HrvMs => "hrvMs",
            MetricField::RestingHr => "restingHr",
            MetricField::Vo2max => "vo2max",
            MetricField::Steps => "steps",
            MetricField::ActiveCalories => "activeCalories",
            MetricField::TrainingLoad => "trainingLoad",
            MetricField::ReadinessScore => "readinessScore",
            MetricField::WeightKg => "weightKg",
            MetricField::BodyFatPercent => "bodyFatPercent",
            MetricField::WorkoutCount => "workoutCount",
        }
    }

    /// Unit string reported in the payload's `units` dictionary.
    pub fn unit(&self) -> &'static str {
        match self {
            MetricField::SleepHours
            | MetricField::DeepSleepHours
            | MetricField::RemSleepHours => "hours",
            MetricField::HrvMs => "ms",
            MetricField::RestingHr => "bpm",
            MetricField::Vo2max => "ml/kg/min",
            MetricField::Steps => "steps",
            MetricField::ActiveCalories => "kcal",
            MetricField::TrainingLoad | MetricField::ReadinessScore => "score",
            MetricField::WeightKg => "kg",
            MetricField::BodyFatPercent => "%",
            MetricField::WorkoutCount => "count",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calendar day of raw, possibly-missing physiological inputs.
///
/// Constructed once per day by the external sensor/storage layer and consumed
/// read-only here. A field may be absent, zero, NaN, or infinite — all four
/// mean "no measurement" and are collapsed by [`crate::quality::normalize_reading`]
/// before any arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDailyEntry {
    /// Calendar date of the measurements.
    pub date: NaiveDate,

    /// Total sleep duration in hours.
    pub sleep_hours: Option<f64>,

    /// Deep (slow-wave) sleep in hours.
    pub deep_sleep_hours: Option<f64>,

    /// REM sleep in hours.
    pub rem_sleep_hours: Option<f64>,

    /// Heart-rate variability (RMSSD) in milliseconds.
    pub hrv_ms: Option<f64>,

    /// Resting heart rate in beats per minute.
    pub resting_hr: Option<f64>,

    /// Estimated VO2max in ml/kg/min.
    pub vo2max: Option<f64>,

    /// Step count.
    pub steps: Option<f64>,

    /// Active energy expenditure in kcal.
    pub active_calories: Option<f64>,

    /// Device-reported training load score.
    pub training_load: Option<f64>,

    /// Device-reported readiness score (0-100).
    pub readiness_score: Option<f64>,

    /// Body weight in kilograms.
    pub weight_kg: Option<f64>,

    /// Body fat percentage.
    pub body_fat_percent: Option<f64>,

    /// Number of recorded workouts that day.
    pub workout_count: Option<f64>,
}

impl RawDailyEntry {
    /// Create an entry for `date` with every metric absent.
    pub fn new(date: NaiveDate) -> Self {
        RawDailyEntry {
            date,
            sleep_hours: None,
            deep_sleep_hours: None,
            rem_sleep_hours: None,
            hrv_ms: None,
            resting_hr: None,
            vo2max: None,
            steps: None,
            active_calories: None,
            training_load: None,
            readiness_score: None,
            weight_kg: None,
            body_fat_percent: None,
            workout_count: None,
        }
    }

    /// Raw (un-normalized) value of a metric field.
    pub fn value(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::SleepHours => self.sleep_hours,
            MetricField::DeepSleepHours => self.deep_sleep_hours,
            MetricField::RemSleepHours => self.rem_sleep_hours,
            MetricField::HrvMs => self.hrv_ms,
            MetricField::RestingHr => self.resting_hr,
            MetricField::Vo2max => self.vo2max,
            MetricField::Steps => self.steps,
            MetricField::ActiveCalories => self.active_calories,
            MetricField::TrainingLoad => self.training_load,
            MetricField::ReadinessScore => self.readiness_score,
            MetricField::WeightKg => self.weight_kg,
            MetricField::BodyFatPercent => self.body_fat_percent,
            MetricField::WorkoutCount => self.workout_count,
        }
    }
}

/// A single heart-rate reading with its wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    /// Heart rate in beats per minute.
    pub value: f64,
    /// When the reading was taken.
    pub timestamp: DateTime<Utc>,
}

impl HeartRateSample {
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        HeartRateSample { value, timestamp }
    }
}

/// Inclusive calendar date range covered by a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Categorical data-quality label for a metric, derived from its coverage
/// count across the full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQualityStatus {
    /// Fewer than 5 valid days.
    InsufficientData,
    /// 5-13 valid days.
    LimitedData,
    /// 14-29 valid days.
    GoodData,
    /// 30+ valid days.
    HighConfidenceData,
}

impl DataQualityStatus {
    /// Classify a coverage count (days with a valid, in-range value).
    pub fn from_coverage(count: usize) -> Self {
        match count {
            0..=4 => DataQualityStatus::InsufficientData,
            5..=13 => DataQualityStatus::LimitedData,
            14..=29 => DataQualityStatus::GoodData,
            _ => DataQualityStatus::HighConfidenceData,
        }
    }
}

impl fmt::Display for DataQualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataQualityStatus::InsufficientData => "INSUFFICIENT_DATA",
            DataQualityStatus::LimitedData => "LIMITED_DATA",
            DataQualityStatus::GoodData => "GOOD_DATA",
            DataQualityStatus::HighConfidenceData => "HIGH_CONFIDENCE_DATA",
        };
        f.write_str(s)
    }
}
