//! Core types for the printer purchase predictor.

use serde::{Deserialize, Serialize};

pub type OrderCount = u64;
pub type Money = f64;

/// A probability in `[0, 1]`, serialized as a bare number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Prob(pub f64);

/// Round to two decimal places, half away from zero.
///
/// Values too large to scale by 100 have no fractional part and come back as is.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Render a fraction as a percentage with one decimal, e.g. `0.667` -> `66.7%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown region code: {0}")]
    UnknownRegion(u8),
    #[error("prediction payload out of range: prediction={prediction}, probability={probability}")]
    InvalidPrediction { prediction: f64, probability: f64 },
}

pub mod entry;
pub mod prediction;
pub mod record;

pub use entry::HistoryEntry;
pub use prediction::{PredictionRequest, PredictionResult};
pub use record::{CustomerMetricsRecord, Field, Region};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_matches_two_decimal_rounding() {
        assert_eq!(round2(50.0), 50.0);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }

    #[test]
    fn round2_keeps_huge_values_finite() {
        assert_eq!(round2(1e307), 1e307);
        assert_eq!(round2(f64::MAX), f64::MAX);
        assert!(round2(f64::MAX / 50.0).is_finite());
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(2.0 / 3.0), "66.7%");
        assert_eq!(format_percent(0.6), "60.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
