//! IPMA open-data HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::types::{ForecastResponse, LocationList, WeatherError};

/// Public IPMA open-data root.
pub const IPMA_API_BASE: &str = "https://api.ipma.pt/open-data";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct IpmaClient {
    client: Client,
    base_url: String,
}

impl IpmaClient {
    /// Client for the public API with the default timeout.
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(IPMA_API_BASE, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Client for an arbitrary API root (mirrors, mock servers).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn locations_url(&self) -> String {
        format!("{}/distrits-islands.json", self.base_url)
    }

    pub fn forecast_url(&self, global_id_local: i64) -> String {
        format!(
            "{}/forecast/meteorology/cities/daily/{}.json",
            self.base_url, global_id_local
        )
    }

    /// Fetch the district/island list.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_locations(&self) -> Result<LocationList, WeatherError> {
        let list: LocationList = self.get_json(&self.locations_url()).await?;
        tracing::info!("Fetched {} locations", list.data.len());
        Ok(list)
    }

    /// Fetch the multi-day forecast for a location.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        global_id_local: i64,
    ) -> Result<ForecastResponse, WeatherError> {
        let forecast: ForecastResponse = self.get_json(&self.forecast_url(global_id_local)).await?;
        tracing::info!(
            "Fetched {} forecast days (updated {})",
            forecast.data.len(),
            forecast.data_update
        );
        Ok(forecast)
    }

    /// The body is decoded whatever the status. An error page that is not
    /// the expected JSON is a decode failure; the status only decides the
    /// outcome when the body decodes.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        let response = self.client.get(url).send().await?;
        let status_error = response.error_for_status_ref().err();
        let body = response.text().await?;

        let value = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Failed to decode body from {}: {}", url, e);
            WeatherError::Decode(e)
        })?;

        match status_error {
            Some(e) => Err(WeatherError::Network(e)),
            None => Ok(value),
        }
    }
}
