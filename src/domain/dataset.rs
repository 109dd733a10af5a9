// Dataset domain models - validated at construction, immutable once installed
use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("payload does not match the endpoint schema: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("body '{body}' has {xs} x / {ys} y samples for {timestamps} timestamps")]
    SeriesLengthMismatch {
        body: String,
        xs: usize,
        ys: usize,
        timestamps: usize,
    },
    #[error("timestamp '{0}' is not RFC 3339")]
    BadTimestamp(String),
}

/// Per-body coordinate series in AU, one sample per timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodySeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Planetary positions over time, as served by the positions endpoint.
///
/// Every body's x and y series must have exactly one sample per timestamp;
/// payloads violating that are rejected here, never truncated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionsDataset {
    pub timestamps: Vec<String>,
    pub bodies: BTreeMap<String, BodySeries>,
}

impl PositionsDataset {
    /// Decode and validate an upstream payload into a dataset.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, DatasetError> {
        let dataset: Self = serde_json::from_value(payload)?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        for timestamp in &self.timestamps {
            if chrono::DateTime::parse_from_rfc3339(timestamp).is_err() {
                return Err(DatasetError::BadTimestamp(timestamp.clone()));
            }
        }

        let n = self.timestamps.len();
        for (name, series) in &self.bodies {
            if series.x.len() != n || series.y.len() != n {
                return Err(DatasetError::SeriesLengthMismatch {
                    body: name.clone(),
                    xs: series.x.len(),
                    ys: series.y.len(),
                    timestamps: n,
                });
            }
        }

        Ok(())
    }

    /// Number of playable frames (one per timestamp).
    pub fn frame_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// One observation window of space weather. Instruments report
/// independently, so any metric may be absent in any record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherRecord {
    pub timestamp: String,
    #[serde(default)]
    pub xray_flux: Option<f64>,
    #[serde(default)]
    pub solar_wind_speed: Option<f64>,
    #[serde(default)]
    pub imf_bz: Option<f64>,
    #[serde(default)]
    pub kp_index: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherMetric {
    XrayFlux,
    SolarWindSpeed,
    ImfBz,
    KpIndex,
}

impl WeatherMetric {
    pub const ALL: [WeatherMetric; 4] = [
        WeatherMetric::XrayFlux,
        WeatherMetric::SolarWindSpeed,
        WeatherMetric::ImfBz,
        WeatherMetric::KpIndex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeatherMetric::XrayFlux => "xray_flux",
            WeatherMetric::SolarWindSpeed => "solar_wind_speed",
            WeatherMetric::ImfBz => "imf_bz",
            WeatherMetric::KpIndex => "kp_index",
        }
    }
}

/// Ordered space weather records from the space-weather endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct WeatherDataset {
    pub records: Vec<WeatherRecord>,
}

impl WeatherDataset {
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, DatasetError> {
        Ok(serde_json::from_value(payload)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dense (timestamp, value) pairs for one metric, skipping records where
    /// the instrument reported nothing.
    pub fn metric_series(&self, metric: WeatherMetric) -> Vec<(&str, f64)> {
        self.records
            .iter()
            .filter_map(|record| {
                let value = match metric {
                    WeatherMetric::XrayFlux => record.xray_flux,
                    WeatherMetric::SolarWindSpeed => record.solar_wind_speed,
                    WeatherMetric::ImfBz => record.imf_bz,
                    WeatherMetric::KpIndex => record.kp_index,
                };
                value.map(|v| (record.timestamp.as_str(), v))
            })
            .collect()
    }
}
