use serde::{Deserialize, Serialize};

use crate::record::{CustomerMetricsRecord, Region};
use crate::{CoreError, Money, OrderCount, Prob};

/// Body of the outbound scoring request.
///
/// Same keys as [`CustomerMetricsRecord`]; the high-value flag is sent as `0`/`1`
/// and the region as its integer code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    pub total_orders: OrderCount,
    pub total_spent: Money,
    pub printer_purchases_last_6m: u64,
    pub return_rate: f64,
    pub average_order_value: Money,
    pub product_diversity: u64,
    pub region: Region,
    pub high_value_customer: u8,
}

impl From<&CustomerMetricsRecord> for PredictionRequest {
    fn from(r: &CustomerMetricsRecord) -> Self {
        Self {
            total_orders: r.total_orders,
            total_spent: r.total_spent,
            printer_purchases_last_6m: r.printer_purchases_last_6m,
            return_rate: r.return_rate,
            average_order_value: r.average_order_value,
            product_diversity: r.product_diversity,
            region: r.region,
            high_value_customer: u8::from(r.high_value_customer),
        }
    }
}

impl PredictionRequest {
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Deserialize)]
struct WirePrediction {
    prediction: f64,
    probability: f64,
}

/// Score returned by the prediction service. Only in-range payloads can be
/// constructed or deserialized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "WirePrediction")]
pub struct PredictionResult {
    prediction: u8,
    probability: Prob,
}

impl TryFrom<WirePrediction> for PredictionResult {
    type Error = CoreError;

    fn try_from(wire: WirePrediction) -> Result<Self, Self::Error> {
        let likely = if wire.prediction == 1.0 {
            true
        } else if wire.prediction == 0.0 {
            false
        } else {
            return Err(CoreError::InvalidPrediction {
                prediction: wire.prediction,
                probability: wire.probability,
            });
        };
        PredictionResult::new(likely, wire.probability)
    }
}

impl PredictionResult {
    pub fn new(likely: bool, probability: f64) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(CoreError::InvalidPrediction {
                prediction: f64::from(u8::from(likely)),
                probability,
            });
        }
        Ok(Self { prediction: u8::from(likely), probability: Prob(probability) })
    }

    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(body)?)
    }

    /// `1` if a purchase is predicted, else `0`.
    pub fn prediction(&self) -> u8 {
        self.prediction
    }

    pub fn is_likely(&self) -> bool {
        self.prediction == 1
    }

    pub fn probability(&self) -> f64 {
        self.probability.0
    }

    pub fn label(&self) -> &'static str {
        if self.is_likely() {
            "Likely to Purchase"
        } else {
            "Unlikely to Purchase"
        }
    }

    pub fn short_label(&self) -> &'static str {
        if self.is_likely() {
            "Likely"
        } else {
            "Unlikely"
        }
    }
}
