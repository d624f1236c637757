//! Readiness Score calculation.
//!
//! Readiness is a composite 0-100 estimate of same-day recovery built from
//! four weighted terms: HRV relative to its 7-day baseline (0.35), resting
//! heart rate relative to its baseline (0.25), sleep duration and efficiency
//! (0.30), and residual load from the previous day's training strain (0.10).
//!
//! Every input is optional. An absent input simply drops its term; the final
//! score divides by the sum of the weights that were actually present, so the
//! formula degrades gracefully instead of erroring. With no inputs at all the
//! score is a neutral 50.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Term weights for the composite score.
const HRV_WEIGHT: f64 = 0.35;
const RHR_WEIGHT: f64 = 0.25;
const SLEEP_WEIGHT: f64 = 0.30;
const RECOVERY_WEIGHT: f64 = 0.10;

/// Inputs to a readiness calculation. All optional; absence of a value (or of
/// its baseline, for the ratio terms) excludes the corresponding term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessInput {
    /// Latest HRV (RMSSD) in milliseconds.
    pub hrv: Option<f64>,
    /// 7-day HRV baseline in milliseconds.
    pub hrv_baseline_7d: Option<f64>,
    /// Latest resting heart rate in bpm.
    pub rhr: Option<f64>,
    /// 7-day resting-heart-rate baseline in bpm.
    pub rhr_baseline_7d: Option<f64>,
    /// Last night's total sleep in hours.
    pub sleep_hours: Option<f64>,
    /// Last night's sleep efficiency percentage.
    pub sleep_efficiency: Option<f64>,
    /// Previous day's normalized training strain (0-10).
    pub previous_day_strain: Option<f64>,
    /// Origin label for the inputs (e.g. a device name). Echoed into the
    /// result; defaults to "wearable".
    pub data_source: Option<String>,
}

/// Per-term sub-scores that contributed to a readiness score. A `None` term
/// was excluded for lack of input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessComponents {
    /// HRV-vs-baseline sub-score (0-100).
    pub hrv: Option<f64>,
    /// Resting-HR-vs-baseline sub-score (0-100).
    pub rhr: Option<f64>,
    /// Sleep duration/efficiency sub-score (0-100).
    pub sleep: Option<f64>,
    /// Previous-day-strain recovery sub-score (50-100).
    pub recovery_trend: Option<f64>,
    /// The raw previous-day strain that fed the recovery term.
    pub previous_day_strain: Option<f64>,
}

/// A computed readiness score with its component breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessScore {
    /// Composite score, always within 0-100.
    pub score: u8,
    /// Sub-scores for the terms that were available.
    pub components: ReadinessComponents,
    /// Origin label for the underlying measurements.
    pub data_source: String,
    /// When this score was computed.
    pub calculated_at: DateTime<Utc>,
    /// False only for the neutral default returned when no term was present.
    pub is_calculated: bool,
}

/// Readiness calculation engine.
pub struct ReadinessCalculator;

impl ReadinessCalculator {
    /// Compute a readiness score from whatever inputs are available.
    ///
    /// Each present term contributes `term * weight` to a running weighted
    /// sum, and its weight to a running total; the score is the single
    /// division at the end. Baselines must be positive for their ratio terms
    /// to count.
    pub fn calculate(input: &ReadinessInput) -> ReadinessScore {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        let mut components = ReadinessComponents::default();

        if let (Some(hrv), Some(baseline)) = (input.hrv, input.hrv_baseline_7d) {
            if baseline > 0.0 {
                let term = ((hrv / baseline) * 100.0).clamp(0.0, 100.0);
                components.hrv = Some(term);
                weighted_sum += term * HRV_WEIGHT;
                total_weight += HRV_WEIGHT;
            }
        }

        if let (Some(rhr), Some(baseline)) = (input.rhr, input.rhr_baseline_7d) {
            if baseline > 0.0 {
                // Lower-than-baseline resting HR raises the score.
                let term = (85.0 + ((baseline - rhr) / baseline) * 50.0).clamp(0.0, 100.0);
                components.rhr = Some(term);
                weighted_sum += term * RHR_WEIGHT;
                total_weight += RHR_WEIGHT;
            }
        }

        if let Some(hours) = input.sleep_hours {
            let mut term = Self::sleep_duration_score(hours);
            if matches!(input.sleep_efficiency, Some(eff) if eff > 85.0) {
                term = (term + 5.0).min(100.0);
            }
            components.sleep = Some(term);
            weighted_sum += term * SLEEP_WEIGHT;
            total_weight += SLEEP_WEIGHT;
        }

        if let Some(strain) = input.previous_day_strain {
            let penalty = ((strain - 5.0) * 5.0).max(0.0);
            let term = (100.0 - penalty).max(50.0);
            components.recovery_trend = Some(term);
            components.previous_day_strain = Some(strain);
            weighted_sum += term * RECOVERY_WEIGHT;
            total_weight += RECOVERY_WEIGHT;
        }

        let is_calculated = total_weight > 0.0;
        let score = if is_calculated {
            (weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8
        } else {
            50
        };

        ReadinessScore {
            score,
            components,
            data_source: input
                .data_source
                .clone()
                .unwrap_or_else(|| "wearable".to_string()),
            calculated_at: Utc::now(),
            is_calculated,
        }
    }

    /// Piecewise sleep-duration sub-score: 7-9 h is ideal, with a graded
    /// fall-off on either side and a floor of 20.
    fn sleep_duration_score(hours: f64) -> f64 {
        if (7.0..=9.0).contains(&hours) {
            100.0
        } else if (6.0..7.0).contains(&hours) {
            80.0
        } else if hours > 9.0 && hours <= 10.0 {
            90.0
        } else if (5.0..6.0).contains(&hours) {
            60.0
        } else {
            (40.0 + hours * 5.0).max(20.0)
        }
    }
}
