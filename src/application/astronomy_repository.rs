// Repository trait for fetching validated datasets
use async_trait::async_trait;

use crate::domain::dataset::{PositionsDataset, WeatherDataset};

#[async_trait]
pub trait AstronomyRepository: Send + Sync {
    /// Fetch planetary positions spanning `days`, sampled at `steps` points.
    async fn fetch_positions(&self, days: u32, steps: u32) -> anyhow::Result<PositionsDataset>;

    /// Fetch the space weather series for the trailing observation window.
    async fn fetch_weather(&self) -> anyhow::Result<WeatherDataset>;
}
