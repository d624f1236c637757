//! Sleep efficiency and composite sleep score.
//!
//! Efficiency is the classic ratio of time asleep to time in bed. The
//! composite score weighs duration (40%), deep sleep (25%), REM sleep (20%),
//! and efficiency (15%), renormalizing by the weights of whichever components
//! are actually present — the same graceful-degradation pattern as the
//! readiness score.

use serde::{Deserialize, Serialize};

const DURATION_WEIGHT: f64 = 0.40;
const DEEP_WEIGHT: f64 = 0.25;
const REM_WEIGHT: f64 = 0.20;
const EFFICIENCY_WEIGHT: f64 = 0.15;

/// Result of a sleep-efficiency calculation, echoing its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEfficiency {
    /// Efficiency percentage, clamped to 0-100.
    pub percentage: f64,
    /// Total sleep in hours, as given.
    pub total_sleep_hours: f64,
    /// Time in bed in hours, as given.
    pub time_in_bed_hours: f64,
    /// Time awake in bed, in hours (never negative).
    pub awake_time_hours: f64,
}

/// Sleep scoring engine.
pub struct SleepCalculator;

impl SleepCalculator {
    /// Sleep efficiency = total sleep / time in bed, as a percentage.
    ///
    /// A non-positive time in bed yields zero efficiency and zero awake time
    /// rather than a division by zero.
    pub fn efficiency(total_sleep_hours: f64, time_in_bed_hours: f64) -> SleepEfficiency {
        if time_in_bed_hours <= 0.0 {
            return SleepEfficiency {
                percentage: 0.0,
                total_sleep_hours,
                time_in_bed_hours,
                awake_time_hours: 0.0,
            };
        }

        let percentage = (total_sleep_hours / time_in_bed_hours * 100.0).clamp(0.0, 100.0);
        let awake_time_hours = (time_in_bed_hours - total_sleep_hours).max(0.0);

        SleepEfficiency {
            percentage,
            total_sleep_hours,
            time_in_bed_hours,
            awake_time_hours,
        }
    }

    /// Composite sleep quality score (0-100).
    ///
    /// Duration always contributes; deep, REM, and efficiency contribute only
    /// when provided, with the final score divided by the sum of present
    /// weights.
    pub fn score(
        total_hours: f64,
        deep_hours: Option<f64>,
        rem_hours: Option<f64>,
        efficiency: Option<f64>,
    ) -> u8 {
        let mut weighted_sum = Self::duration_score(total_hours) * DURATION_WEIGHT;
        let mut total_weight = DURATION_WEIGHT;

        if let Some(deep) = deep_hours {
            weighted_sum += Self::stage_score(deep) * DEEP_WEIGHT;
            total_weight += DEEP_WEIGHT;
        }
        if let Some(rem) = rem_hours {
            weighted_sum += Self::stage_score(rem) * REM_WEIGHT;
            total_weight += REM_WEIGHT;
        }
        if let Some(eff) = efficiency {
            weighted_sum += Self::efficiency_score(eff) * EFFICIENCY_WEIGHT;
            total_weight += EFFICIENCY_WEIGHT;
        }

        (weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8
    }

    /// Duration term: 7-9 h ideal, graded fall-off on either side.
    fn duration_score(hours: f64) -> f64 {
        if (7.0..=9.0).contains(&hours) {
            100.0
        } else if (6.0..7.0).contains(&hours) {
            80.0
        } else if (5.0..6.0).contains(&hours) {
            60.0
        } else if hours > 9.0 && hours <= 10.0 {
            90.0
        } else {
            (hours * 10.0).max(20.0)
        }
    }

    /// Deep/REM stage term: 1.5-2.5 h is the target band for both stages.
    fn stage_score(hours: f64) -> f64 {
        if (1.5..=2.5).contains(&hours) {
            100.0
        } else if (1.0..1.5).contains(&hours) {
            75.0
        } else if hours > 2.5 && hours < 3.0 {
            90.0
        } else {
            (hours * 40.0).max(30.0)
        }
    }

    /// Efficiency term.
    fn efficiency_score(efficiency: f64) -> f64 {
        if efficiency >= 90.0 {
            100.0
        } else if (85.0..90.0).contains(&efficiency) {
            90.0
        } else if (80.0..85.0).contains(&efficiency) {
            75.0
        } else {
            efficiency.max(30.0)
        }
    }
}
