//! Training Strain (TRIMP) calculation from raw heart-rate samples.
//!
//! Strain is a heart-rate-zone-weighted integral of exercise intensity over
//! time. Each sample is attributed the time until the next sample, capped so
//! that a single multi-hour gap in a sparse recording cannot dominate the
//! integral, and the final sample is attributed a fixed short duration. Zone
//! assignment uses percent of heart-rate reserve (the span between resting
//! and maximum heart rate).
//!
//! The gap cap and final-sample duration are sampling-rate heuristics, so
//! they live in [`StrainConfig`] rather than as hard-coded magic numbers.

use crate::models::HeartRateSample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fmt;

/// TRIMP weighting per heart-rate zone (zones 1-5).
const ZONE_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 4.0, 7.0, 10.0];

/// Tunable constants for strain calculation.
///
/// Defaults suit typical wearable sampling; a device with sparser sampling may
/// warrant a larger gap cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainConfig {
    /// Longest inter-sample gap (seconds) attributed to a single sample.
    pub max_gap_seconds: f64,
    /// Duration (seconds) attributed to the final sample.
    pub final_sample_seconds: f64,
    /// Resting heart rate assumed when the caller has no measured value.
    pub default_resting_hr: f64,
}

impl Default for StrainConfig {
    fn default() -> Self {
        StrainConfig {
            max_gap_seconds: 300.0,
            final_sample_seconds: 60.0,
            default_resting_hr: 60.0,
        }
    }
}

/// Training effect classification on the normalized 0-10 strain scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainingEffect {
    /// 0-2: recovery-level effort.
    Recovery,
    /// 2-4: maintains current fitness.
    Maintaining,
    /// 4-6: improves fitness.
    Improving,
    /// 6-8: strongly improves fitness.
    HighlyImproving,
    /// 8-10: risk of overtraining.
    Overreaching,
}

impl TrainingEffect {
    /// Bucket a normalized strain score.
    pub fn from_score(normalized: f64) -> Self {
        match normalized {
            s if s < 2.0 => TrainingEffect::Recovery,
            s if s < 4.0 => TrainingEffect::Maintaining,
            s if s < 6.0 => TrainingEffect::Improving,
            s if s < 8.0 => TrainingEffect::HighlyImproving,
            _ => TrainingEffect::Overreaching,
        }
    }

    /// Human-readable description of the effect level.
    pub fn description(&self) -> &'static str {
        match self {
            TrainingEffect::Recovery => "Recovery-level effort, minimal training stress",
            TrainingEffect::Maintaining => "Maintains current fitness level",
            TrainingEffect::Improving => "Improves fitness level",
            TrainingEffect::HighlyImproving => "Significant fitness improvement",
            TrainingEffect::Overreaching => "Very high load, plan for recovery",
        }
    }
}

impl fmt::Display for TrainingEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrainingEffect::Recovery => "Recovery",
            TrainingEffect::Maintaining => "Maintaining",
            TrainingEffect::Improving => "Improving",
            TrainingEffect::HighlyImproving => "Highly Improving",
            TrainingEffect::Overreaching => "Overreaching",
        };
        f.write_str(s)
    }
}

/// A computed training strain with its zone breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStrain {
    /// Raw TRIMP value (unbounded).
    pub score: f64,
    /// TRIMP clamped to the 0-10 display scale.
    pub normalized_score: f64,
    /// Seconds accumulated per zone (1-5); zones never entered are absent.
    pub heart_rate_zones: BTreeMap<u8, f64>,
    /// Highest raw sample value, if any samples were given.
    pub peak_hr: Option<f64>,
    /// Arithmetic mean of raw sample values (not time-weighted).
    pub avg_hr: Option<f64>,
    /// Total seconds attributed across all zones.
    pub duration_seconds: f64,
    /// Effect bucket for the normalized score.
    pub training_effect: TrainingEffect,
    /// When this strain was computed.
    pub calculated_at: DateTime<Utc>,
}

impl TrainingStrain {
    /// The zero-strain result used for degenerate inputs.
    fn zero() -> Self {
        TrainingStrain {
            score: 0.0,
            normalized_score: 0.0,
            heart_rate_zones: BTreeMap::new(),
            peak_hr: None,
            avg_hr: None,
            duration_seconds: 0.0,
            training_effect: TrainingEffect::Recovery,
            calculated_at: Utc::now(),
        }
    }
}

/// Strain calculation engine.
pub struct StrainCalculator;

impl StrainCalculator {
    /// Calculate strain with the default configuration and its default
    /// resting heart rate.
    pub fn calculate(samples: &[HeartRateSample], max_hr: f64) -> TrainingStrain {
        let config = StrainConfig::default();
        Self::calculate_with_config(samples, max_hr, config.default_resting_hr, &config)
    }

    /// Calculate strain with explicit resting heart rate and configuration.
    ///
    /// Empty samples or a non-positive heart-rate reserve (`max_hr <=
    /// resting_hr`) yield a zero-strain recovery result rather than dividing
    /// by zero.
    pub fn calculate_with_config(
        samples: &[HeartRateSample],
        max_hr: f64,
        resting_hr: f64,
        config: &StrainConfig,
    ) -> TrainingStrain {
        if samples.is_empty() || max_hr <= resting_hr {
            tracing::debug!(
                sample_count = samples.len(),
                max_hr,
                resting_hr,
                "degenerate strain input, returning zero strain"
            );
            return TrainingStrain::zero();
        }

        let mut sorted: Vec<HeartRateSample> = samples.to_vec();
        sorted.sort_by_key(|s| s.timestamp);

        let mut zones: BTreeMap<u8, f64> = BTreeMap::new();
        let mut duration_seconds = 0.0;

        for (i, sample) in sorted.iter().enumerate() {
            let seconds = match sorted.get(i + 1) {
                Some(next) => {
                    let gap = (next.timestamp - sample.timestamp).num_milliseconds() as f64 / 1000.0;
                    gap.min(config.max_gap_seconds)
                }
                None => config.final_sample_seconds,
            };

            let zone = Self::zone_for(sample.value, resting_hr, max_hr);
            *zones.entry(zone).or_insert(0.0) += seconds;
            duration_seconds += seconds;
        }

        let score: f64 = zones
            .iter()
            .map(|(zone, seconds)| (seconds / 3600.0) * ZONE_MULTIPLIERS[(*zone - 1) as usize])
            .sum();
        let normalized_score = score.min(10.0);

        let avg_hr = sorted.iter().map(|s| s.value).mean();
        let peak_hr = sorted.iter().map(|s| s.value).fold(f64::MIN, f64::max);

        TrainingStrain {
            score,
            normalized_score,
            heart_rate_zones: zones,
            peak_hr: Some(peak_hr),
            avg_hr: Some(avg_hr),
            duration_seconds,
            training_effect: TrainingEffect::from_score(normalized_score),
            calculated_at: Utc::now(),
        }
    }

    /// Zone (1-5) for a heart rate, by percent of heart-rate reserve.
    ///
    /// Caller guarantees `max_hr > resting_hr`.
    pub fn zone_for(hr: f64, resting_hr: f64, max_hr: f64) -> u8 {
        let pct = (hr - resting_hr) / (max_hr - resting_hr) * 100.0;
        match pct {
            p if p < 50.0 => 1,
            p if p < 60.0 => 2,
            p if p < 70.0 => 3,
            p if p < 80.0 => 4,
            _ => 5,
        }
    }
}
