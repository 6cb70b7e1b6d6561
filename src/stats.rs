use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::StatsConfig;
use crate::error::AppError;
use crate::selection::Selection;

// -- Request body --

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceQuery {
    pub query: Vec<DimensionFilter>,
    pub response: ResponseFormat,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DimensionFilter {
    pub code: String,
    pub selection: ItemSelection,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemSelection {
    pub filter: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseFormat {
    pub format: String,
}

impl DimensionFilter {
    fn items(code: &str, values: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            selection: ItemSelection {
                filter: "item".to_string(),
                values,
            },
        }
    }
}

impl PriceQuery {
    /// Cross product of the selected house types and quarters for the
    /// configured metric. Filter order is house type, metric, time; that order
    /// decides the block layout of the response.
    pub fn new(config: &StatsConfig, selection: &Selection) -> Self {
        Self {
            query: vec![
                DimensionFilter::items(
                    &config.house_type_dimension,
                    selection.house_types.clone(),
                ),
                DimensionFilter::items(&config.contents_dimension, vec![config.metric.clone()]),
                DimensionFilter::items(&config.time_dimension, selection.quarters.clone()),
            ],
            response: ResponseFormat {
                format: config.response_format.clone(),
            },
        }
    }
}

// -- Response --

/// The part of a JSON-stat2 dataset this app reads. Suppressed cells are `null`.
#[derive(Debug, Deserialize)]
struct JsonStatDataset {
    value: Vec<Option<f64>>,
}

/// Flat price values together with the lists they were requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragePrices {
    pub values: Vec<f64>,
    pub house_types: Vec<String>,
    pub quarters: Vec<String>,
}

impl AveragePrices {
    /// Decode a provider body for the given selection. Missing cells become `NaN`.
    pub fn from_json(body: &str, selection: &Selection) -> Result<Self, AppError> {
        let dataset: JsonStatDataset =
            serde_json::from_str(body).map_err(|e| AppError::Decode(e.to_string()))?;
        Ok(Self {
            values: dataset
                .value
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect(),
            house_types: selection.house_types.clone(),
            quarters: selection.quarters.clone(),
        })
    }
}

// -- Client --

/// Issues the price query. One POST per call, no retries.
#[derive(Debug, Clone, Default)]
pub struct StatsClient {
    http: reqwest::Client,
    config: StatsConfig,
}

impl StatsClient {
    pub fn new(config: StatsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    pub async fn fetch_average_prices(
        &self,
        selection: &Selection,
    ) -> Result<AveragePrices, AppError> {
        let body = PriceQuery::new(&self.config, selection);
        debug!(
            "Requesting {} house types x {} quarters from {}",
            selection.house_types.len(),
            selection.quarters.len(),
            self.config.endpoint
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Price request failed: {}", e);
                AppError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Price request returned {}", status);
            return Err(AppError::Status(status.as_u16()));
        }

        let text = response.text().await.map_err(AppError::from)?;
        let prices = AveragePrices::from_json(&text, selection).inspect_err(|e| {
            warn!("Failed to decode price response: {}", e);
        })?;
        debug!("Received {} price values", prices.values.len());
        Ok(prices)
    }
}
