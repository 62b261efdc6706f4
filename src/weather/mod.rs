//! OpenWeather integration
//!
//! HTTP client, payload types and forecast reduction.

pub mod client;
pub mod forecast;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::weather::types::{DailyForecast, WeatherSnapshot};

/// Source of weather data used by the tool handler
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions for `city`
    async fn current(&self, city: &str) -> Result<WeatherSnapshot>;

    /// Up to seven daily forecasts for `city`
    async fn forecast(&self, city: &str) -> Result<Vec<DailyForecast>>;
}
