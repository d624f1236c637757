// Scoring and data-quality core for daily physiological time series.
//
// Two independent subsystems: pure score calculators (readiness, training
// strain, sleep) and a payload builder that turns a raw daily history into a
// quality-annotated, serializable analysis payload.

pub mod formulas;
pub mod models;
pub mod payload;
pub mod quality;
pub mod readiness;
pub mod sleep;
pub mod strain;

// Re-export commonly used types for convenience
pub use models::{
    DataQualityStatus, DateRange, HeartRateSample, MetricField, RawDailyEntry,
};
pub use payload::{AnalysisPayload, HistoryError, PayloadBuilder, WeeklyAggregate};
pub use quality::{DailyQualityRecord, FieldStatus, PlausibleRange};
pub use readiness::{ReadinessCalculator, ReadinessInput, ReadinessScore};
pub use sleep::{SleepCalculator, SleepEfficiency};
pub use strain::{StrainCalculator, StrainConfig, TrainingEffect, TrainingStrain};
