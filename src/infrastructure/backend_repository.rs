// Astronomy backend repository implementation
use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use super::proxy::{ProxyTarget, RequestForwarder, UpstreamOutcome, build_target};
use crate::application::astronomy_repository::AstronomyRepository;
use crate::domain::dataset::{PositionsDataset, WeatherDataset};

/// Fetches datasets from the astronomy backend and validates them at the
/// boundary, before they can become session state.
#[derive(Debug, Clone)]
pub struct BackendRepository {
    base_url: String,
    forwarder: RequestForwarder,
}

impl BackendRepository {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            forwarder: RequestForwarder::new(),
        }
    }

    async fn fetch_json(&self, target: &ProxyTarget) -> Result<serde_json::Value> {
        match self.forwarder.forward(target).await {
            UpstreamOutcome::Success(payload) => Ok(payload),
            UpstreamOutcome::HttpFailure {
                status,
                status_text,
            } => bail!("backend returned {status}: {status_text}"),
            UpstreamOutcome::ConnectionFailure => bail!("failed to connect to backend"),
            UpstreamOutcome::MalformedPayload => bail!("backend returned a non-JSON payload"),
        }
    }
}

#[async_trait]
impl AstronomyRepository for BackendRepository {
    async fn fetch_positions(&self, days: u32, steps: u32) -> Result<PositionsDataset> {
        let query = format!("?days={days}&steps={steps}");
        let target = build_target(&self.base_url, &["v1", "astronomy", "positions"], &query);
        let payload = self.fetch_json(&target).await?;

        PositionsDataset::from_payload(payload).context("rejected positions payload")
    }

    async fn fetch_weather(&self) -> Result<WeatherDataset> {
        let target = build_target(&self.base_url, &["v1", "astronomy", "space-weather"], "");
        let payload = self.fetch_json(&target).await?;

        WeatherDataset::from_payload(payload).context("rejected space weather payload")
    }
}
