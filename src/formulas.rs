//! Small physiological formulas: HRV trend and max-heart-rate estimation.

use statrs::statistics::Statistics;

/// Relative HRV trend: mean of the recent window against a 30-day baseline,
/// clamped to [-1, +1].
///
/// Returns 0 when the window is empty or the baseline is non-positive.
pub fn hrv_trend(recent_7d: &[f64], baseline_30d: f64) -> f64 {
    if recent_7d.is_empty() || baseline_30d <= 0.0 {
        return 0.0;
    }
    let mean = recent_7d.iter().mean();
    ((mean - baseline_30d) / baseline_30d).clamp(-1.0, 1.0)
}

/// Tanaka age-predicted maximum heart rate: `208 - 0.7 * age`.
pub fn estimate_max_hr(age_years: u32) -> f64 {
    208.0 - 0.7 * age_years as f64
}

/// Inverse of the Tanaka formula: the age (floored, never negative) that
/// predicts a given maximum heart rate.
pub fn estimate_age(observed_max_hr: f64) -> u32 {
    (((208.0 - observed_max_hr) / 0.7).floor()).max(0.0) as u32
}
