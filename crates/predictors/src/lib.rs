//! Prediction client trait and the HTTP scoring client.

use pp_core::{PredictionRequest, PredictionResult};

pub mod config;
pub mod http;

pub use config::{ApiKey, ClientConfig, ConfigError};
pub use http::HttpPredictionClient;

/// Message shown to the user whenever a prediction could not be obtained.
pub const PREDICTION_FAILED_MESSAGE: &str = "Failed to get prediction. Please try again.";

/// The one failure signal a prediction call can produce. Transport errors,
/// non-success statuses and malformed bodies all collapse into it; the cause
/// is logged by the client, not carried.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Failed to get prediction. Please try again.")]
pub struct PredictionFailed;

/// A scoring backend. One call is one request; implementations do not retry.
pub trait PredictionClient: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionFailed>;
}
