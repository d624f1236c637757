//! Missing-value normalization and plausibility checks.
//!
//! Consumer wearables routinely report sensor gaps as a literal zero, and
//! failed reads occasionally surface as NaN or infinity. This module collapses
//! all of those into a single absent-marker before any arithmetic, and then
//! classifies each surviving value against a physiologically plausible range.
//! The result is a three-state status per field: present, missing, or outlier.
//! Outliers are excluded from aggregates but always reported back — they are
//! never silently dropped.

use crate::models::{MetricField, RawDailyEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Closed numeric interval a metric value must fall in to count as plausible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlausibleRange {
    pub min: f64,
    pub max: f64,
}

impl PlausibleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        PlausibleRange { min, max }
    }

    /// Whether `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Plausible range for a metric.
///
/// A normalized value outside this range is an outlier. Bounds are inclusive;
/// the exact figures reflect what a healthy-to-hard-training adult can
/// physiologically produce, with generous margins.
pub fn plausible_range(field: MetricField) -> PlausibleRange {
    match field {
        MetricField::SleepHours => PlausibleRange::new(2.0, 14.0),
        MetricField::DeepSleepHours => PlausibleRange::new(0.25, 6.0),
        MetricField::RemSleepHours => PlausibleRange::new(0.25, 6.0),
        MetricField::HrvMs => PlausibleRange::new(15.0, 150.0),
        MetricField::RestingHr => PlausibleRange::new(35.0, 100.0),
        MetricField::Vo2max => PlausibleRange::new(20.0, 90.0),
        MetricField::Steps => PlausibleRange::new(500.0, 80_000.0),
        MetricField::ActiveCalories => PlausibleRange::new(50.0, 8_000.0),
        MetricField::TrainingLoad => PlausibleRange::new(1.0, 1_000.0),
        MetricField::ReadinessScore => PlausibleRange::new(1.0, 100.0),
        MetricField::WeightKg => PlausibleRange::new(30.0, 250.0),
        MetricField::BodyFatPercent => PlausibleRange::new(3.0, 60.0),
        MetricField::WorkoutCount => PlausibleRange::new(1.0, 20.0),
    }
}

/// Normalize a raw reading: zero, NaN, and infinities all mean "no
/// measurement" and map to `None`.
///
/// This is a deliberate domain rule, not a convenience: a sensor reporting
/// exactly 0 steps or 0 ms HRV for a day is almost always an unsynced device,
/// not a true zero reading.
pub fn normalize_reading(value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => Some(v),
        _ => None,
    }
}

/// Whether a normalized (non-missing) value is implausible for its metric.
pub fn is_outlier(field: MetricField, value: f64) -> bool {
    !plausible_range(field).contains(value)
}

/// Per-field status after normalization and plausibility classification.
///
/// The three states are mutually exclusive by construction; the
/// missing/outlier sets on [`DailyQualityRecord`] are derived views of this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldStatus {
    /// Normalized value present and within its plausible range.
    Present(f64),
    /// No measurement (absent, zero, NaN, or infinite).
    Missing,
    /// Normalized value present but outside its plausible range. The value is
    /// retained so callers can inspect what the sensor reported.
    Outlier(f64),
}

impl FieldStatus {
    /// Classify one raw reading for `field`.
    pub fn classify(field: MetricField, raw: Option<f64>) -> Self {
        match normalize_reading(raw) {
            None => FieldStatus::Missing,
            Some(v) if is_outlier(field, v) => FieldStatus::Outlier(v),
            Some(v) => FieldStatus::Present(v),
        }
    }

    /// The normalized value, if any measurement survived normalization
    /// (outliers included).
    pub fn normalized(&self) -> Option<f64> {
        match self {
            FieldStatus::Present(v) | FieldStatus::Outlier(v) => Some(*v),
            FieldStatus::Missing => None,
        }
    }

    /// The value if it is present and in range; outliers and missing yield
    /// `None`. This is what aggregates and coverage counts consume.
    pub fn in_range(&self) -> Option<f64> {
        match self {
            FieldStatus::Present(v) => Some(*v),
            _ => None,
        }
    }
}

/// Per-day projection of a [`RawDailyEntry`] after normalization.
///
/// `values` holds every normalized reading (outliers included, so nothing is
/// dropped without a trace); `missing_fields` and `outlier_fields` are the
/// explicit per-field annotations. Built fresh per call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyQualityRecord {
    pub date: NaiveDate,

    /// Normalized values by field; absent where missing.
    pub values: BTreeMap<MetricField, f64>,

    /// Fields with no measurement after normalization.
    pub missing_fields: BTreeSet<MetricField>,

    /// Fields whose normalized value fell outside its plausible range.
    pub outlier_fields: BTreeSet<MetricField>,
}

impl DailyQualityRecord {
    /// Classify every metric of a raw entry.
    pub fn from_entry(entry: &RawDailyEntry) -> Self {
        let mut values = BTreeMap::new();
        let mut missing_fields = BTreeSet::new();
        let mut outlier_fields = BTreeSet::new();

        for field in MetricField::ALL {
            match FieldStatus::classify(field, entry.value(field)) {
                FieldStatus::Present(v) => {
                    values.insert(field, v);
                }
                FieldStatus::Outlier(v) => {
                    values.insert(field, v);
                    outlier_fields.insert(field);
                }
                FieldStatus::Missing => {
                    missing_fields.insert(field);
                }
            }
        }

        DailyQualityRecord {
            date: entry.date,
            values,
            missing_fields,
            outlier_fields,
        }
    }

    /// Status of a single field on this day.
    pub fn status(&self, field: MetricField) -> FieldStatus {
        if self.missing_fields.contains(&field) {
            FieldStatus::Missing
        } else if self.outlier_fields.contains(&field) {
            FieldStatus::Outlier(self.values[&field])
        } else {
            FieldStatus::Present(self.values[&field])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_normalize_zero_nan_inf_absent() {
        assert_eq!(normalize_reading(None), None);
        assert_eq!(normalize_reading(Some(0.0)), None);
        assert_eq!(normalize_reading(Some(-0.0)), None);
        assert_eq!(normalize_reading(Some(f64::NAN)), None);
        assert_eq!(normalize_reading(Some(f64::INFINITY)), None);
        assert_eq!(normalize_reading(Some(f64::NEG_INFINITY)), None);
        assert_eq!(normalize_reading(Some(7.5)), Some(7.5));
        assert_eq!(normalize_reading(Some(-3.0)), Some(-3.0));
    }

    #[test]
    fn test_plausible_range_boundaries_inclusive() {
        assert!(!is_outlier(MetricField::SleepHours, 2.0));
        assert!(!is_outlier(MetricField::SleepHours, 14.0));
        assert!(is_outlier(MetricField::SleepHours, 1.9));
        assert!(is_outlier(MetricField::SleepHours, 14.1));

        assert!(!is_outlier(MetricField::HrvMs, 15.0));
        assert!(!is_outlier(MetricField::HrvMs, 150.0));
        assert!(is_outlier(MetricField::HrvMs, 151.0));

        assert!(is_outlier(MetricField::Steps, 95_000.0));
        assert!(!is_outlier(MetricField::Steps, 12_000.0));
    }

    #[test]
    fn test_field_status_three_states() {
        assert_eq!(
            FieldStatus::classify(MetricField::Steps, Some(10_000.0)),
            FieldStatus::Present(10_000.0)
        );
        assert_eq!(
            FieldStatus::classify(MetricField::Steps, Some(0.0)),
            FieldStatus::Missing
        );
        assert_eq!(
            FieldStatus::classify(MetricField::Steps, Some(95_000.0)),
            FieldStatus::Outlier(95_000.0)
        );

        assert_eq!(FieldStatus::Outlier(95_000.0).normalized(), Some(95_000.0));
        assert_eq!(FieldStatus::Outlier(95_000.0).in_range(), None);
        assert_eq!(FieldStatus::Present(10_000.0).in_range(), Some(10_000.0));
        assert_eq!(FieldStatus::Missing.normalized(), None);
    }

    #[test]
    fn test_record_separates_missing_from_outlier() {
        // steps == 0 is a sensor gap; steps == 95000 is a flagged outlier
        let mut entry = RawDailyEntry::new(day(1));
        entry.steps = Some(0.0);
        entry.hrv_ms = Some(55.0);
        entry.resting_hr = Some(250.0);

        let record = DailyQualityRecord::from_entry(&entry);

        assert!(record.missing_fields.contains(&MetricField::Steps));
        assert!(!record.outlier_fields.contains(&MetricField::Steps));
        assert!(record.outlier_fields.contains(&MetricField::RestingHr));
        assert!(!record.missing_fields.contains(&MetricField::RestingHr));

        // outlier value retained, missing value absent
        assert_eq!(record.values.get(&MetricField::RestingHr), Some(&250.0));
        assert_eq!(record.values.get(&MetricField::Steps), None);
        assert_eq!(record.values.get(&MetricField::HrvMs), Some(&55.0));
    }

    #[test]
    fn test_record_states_mutually_exclusive() {
        let mut entry = RawDailyEntry::new(day(2));
        entry.sleep_hours = Some(7.2);
        entry.hrv_ms = Some(f64::NAN);
        entry.steps = Some(95_000.0);

        let record = DailyQualityRecord::from_entry(&entry);

        for field in MetricField::ALL {
            let missing = record.missing_fields.contains(&field);
            let outlier = record.outlier_fields.contains(&field);
            assert!(!(missing && outlier), "{field} is both missing and outlier");
            let present = record.values.contains_key(&field) && !outlier;
            assert_eq!(
                missing as u8 + outlier as u8 + present as u8,
                1,
                "{field} must be in exactly one state"
            );
        }
    }

    #[test]
    fn test_record_status_roundtrip() {
        let mut entry = RawDailyEntry::new(day(3));
        entry.hrv_ms = Some(60.0);
        entry.steps = Some(95_000.0);

        let record = DailyQualityRecord::from_entry(&entry);
        assert_eq!(record.status(MetricField::HrvMs), FieldStatus::Present(60.0));
        assert_eq!(record.status(MetricField::Steps), FieldStatus::Outlier(95_000.0));
        assert_eq!(record.status(MetricField::SleepHours), FieldStatus::Missing);
    }
}
