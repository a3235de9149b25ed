use std::time::Instant;

use anyhow::{Context, Result};
use pp_core::{PredictionRequest, PredictionResult};
use tracing::{debug, warn};

use crate::config::{ApiKey, ClientConfig, ConfigError};
use crate::{PredictionClient, PredictionFailed};

/// Blocking JSON-over-HTTP client for the scoring endpoint.
pub struct HttpPredictionClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: ApiKey,
}

impl HttpPredictionClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.clone();
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Ok(Self { agent, endpoint: config.endpoint.clone(), api_key })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .set("x-api-key", self.api_key.expose())
            .send_json(request)
            .with_context(|| format!("POST {}", self.endpoint))?;
        let body = response.into_string().context("reading response body")?;
        PredictionResult::from_json(&body).context("decoding prediction response")
    }
}

impl PredictionClient for HttpPredictionClient {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionFailed> {
        let started = Instant::now();
        match self.call(request) {
            Ok(result) => {
                debug!(
                    prediction = result.prediction(),
                    probability = result.probability(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "prediction received"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), endpoint = %self.endpoint, "prediction request failed");
                Err(PredictionFailed)
            }
        }
    }
}
