//! OpenWeather type definitions
//!
//! The `Ow*` types mirror the OpenWeather API responses; the rest are the
//! reduced records handed to the tool layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::weather::forecast::ForecastZone;

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    /// The requested location, verbatim
    pub city: String,

    /// Weather category (e.g. "Clear", "Rain")
    pub weather: String,

    /// Localized description
    pub description: String,

    /// Temperature in °C
    pub temp: f64,

    /// Feels-like temperature in °C
    pub feels_like: f64,

    /// Relative humidity in percent
    pub humidity: u8,
}

/// One 3-hour forecast sample, with its timestamp already in the forecast zone
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub local_time: NaiveDateTime,
    pub description: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

/// Representative forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub description: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

impl From<ForecastEntry> for DailyForecast {
    fn from(entry: ForecastEntry) -> Self {
        Self {
            date: entry.local_time.date(),
            description: entry.description,
            temp: entry.temp,
            temp_min: entry.temp_min,
            temp_max: entry.temp_max,
            humidity: entry.humidity,
        }
    }
}

// ==================== OpenWeather payloads ====================

/// Entry of the `weather` array in a current-conditions response
#[derive(Debug, Deserialize)]
pub(crate) struct OwCondition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwCurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

/// Response of `GET /weather`
#[derive(Debug, Deserialize)]
pub(crate) struct OwCurrentResponse {
    #[serde(default)]
    pub weather: Vec<OwCondition>,
    pub main: OwCurrentMain,
}

impl OwCurrentResponse {
    /// Reduce to a snapshot labelled with the requested city
    pub fn into_snapshot(self, city: &str) -> Result<WeatherSnapshot, ToolError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::malformed("response contains no weather conditions"))?;

        Ok(WeatherSnapshot {
            city: city.to_string(),
            weather: condition.main,
            description: condition.description,
            temp: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
        })
    }
}

/// Entry of the `weather` array in a forecast sample
#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastCondition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastItem {
    pub dt: i64,
    pub main: OwForecastMain,
    #[serde(default)]
    pub weather: Vec<OwForecastCondition>,
}

/// Response of `GET /forecast`
#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastResponse {
    pub list: Vec<OwForecastItem>,
}

impl OwForecastItem {
    /// Convert the sample's timestamp into `zone` and keep the fields we render
    pub fn into_entry(self, zone: ForecastZone) -> Result<ForecastEntry, ToolError> {
        let local_time = zone
            .local_time(self.dt)
            .ok_or_else(|| ToolError::malformed(format!("timestamp out of range: {}", self.dt)))?;

        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| {
                ToolError::malformed(format!("forecast sample {} has no weather conditions", self.dt))
            })?;

        Ok(ForecastEntry {
            local_time,
            description,
            temp: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_current_response_deserialize() {
        let json = r#"{
            "coord": {"lon": 116.4, "lat": 39.9},
            "weather": [{"id": 800, "main": "Clear", "description": "晴", "icon": "01d"}],
            "main": {"temp": 20.5, "feels_like": 19, "temp_min": 18, "temp_max": 22, "humidity": 50},
            "name": "Beijing"
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        let snapshot = parsed.into_snapshot("beijing").unwrap();
        assert_eq!(snapshot.city, "beijing");
        assert_eq!(snapshot.weather, "Clear");
        assert_eq!(snapshot.description, "晴");
        assert_eq!(snapshot.temp, 20.5);
        assert_eq!(snapshot.feels_like, 19.0);
        assert_eq!(snapshot.humidity, 50);
    }

    #[test]
    fn test_current_response_without_conditions() {
        let json = r#"{"weather": [], "main": {"temp": 1, "feels_like": 1, "humidity": 1}}"#;
        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        let err = parsed.into_snapshot("Oslo").unwrap_err();
        assert!(matches!(err, ToolError::MalformedResponse { .. }));
    }

    #[test]
    fn test_forecast_item_into_entry() {
        let json = r#"{
            "dt": 1700006400,
            "main": {"temp": 5.26, "feels_like": 2, "temp_min": 4.1, "temp_max": 6.3, "humidity": 71},
            "weather": [{"id": 500, "main": "Rain", "description": "小雨"}],
            "dt_txt": "2023-11-15 00:00:00"
        }"#;

        let item: OwForecastItem = serde_json::from_str(json).unwrap();
        let zone = ForecastZone::Fixed(FixedOffset::east_opt(8 * 3600).unwrap());
        let entry = item.into_entry(zone).unwrap();

        assert_eq!(entry.local_time.to_string(), "2023-11-15 08:00:00");
        assert_eq!(entry.description, "小雨");
        assert_eq!(entry.temp_max, 6.3);
        assert_eq!(entry.humidity, 71);
    }
}
