//! OpenWeather API client
//!
//! Fetches current conditions and the 3-hourly forecast and reduces them to
//! [`WeatherSnapshot`] and [`DailyForecast`] records.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{openweather, Config};
use crate::error::{Result, ToolError};
use crate::weather::forecast::{summarize_daily, ForecastZone};
use crate::weather::types::{
    DailyForecast, OwCurrentResponse, OwForecastResponse, WeatherSnapshot,
};
use crate::weather::WeatherSource;

/// OpenWeather API client
#[derive(Debug, Clone)]
pub struct WeatherClient {
    /// HTTP client
    http_client: reqwest::Client,

    api_key: String,

    base_url: String,

    timeout: Duration,

    /// Zone used to split forecast samples into days
    zone: ForecastZone,
}

impl WeatherClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout,
            zone: config.utc_offset.into(),
        }
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetch current conditions for `city`
    pub async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot> {
        let response: OwCurrentResponse = self
            .get_json(openweather::CURRENT_PATH, city, &[])
            .await?;

        Ok(response.into_snapshot(city)?)
    }

    /// Fetch the 3-hourly forecast for `city` and reduce it to at most 7 days
    pub async fn fetch_forecast(&self, city: &str) -> Result<Vec<DailyForecast>> {
        let count = openweather::FORECAST_SAMPLE_COUNT.to_string();
        let response: OwForecastResponse = self
            .get_json(openweather::FORECAST_PATH, city, &[("cnt", count.as_str())])
            .await?;

        let entries = response
            .list
            .into_iter()
            .map(|item| item.into_entry(self.zone))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summarize_daily(entries))
    }

    /// GET `path` with the common query parameters and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        city: &str,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint_url(path);
        debug!(%url, city, "Requesting OpenWeather");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", openweather::UNITS),
                ("lang", openweather::LANG),
            ])
            .query(extra)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), city, "OpenWeather request failed");
            return Err(ToolError::UpstreamHttp {
                status: status.as_u16(),
                body: truncate_body(&body),
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|e| ToolError::malformed(e.to_string()).into())
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot> {
        self.fetch_current(city).await
    }

    async fn forecast(&self, city: &str) -> Result<Vec<DailyForecast>> {
        self.fetch_forecast(city).await
    }
}

/// Keep error bodies short enough for a notification
fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    match body.char_indices().nth(MAX_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
