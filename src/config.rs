//! Configuration management for the Weather MCP Server
//!
//! Holds the values passed in from the command line and the OpenWeather
//! request constants.

use std::time::Duration;

use chrono::FixedOffset;
use tracing::level_filters::LevelFilter;

use crate::error::{ConfigError, Result};

/// Configuration for the Weather MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeather API key
    pub api_key: String,

    /// Port the Streamable HTTP transport listens on
    pub port: u16,

    /// Log verbosity
    pub log_level: LevelFilter,

    /// Answer tool calls with a single JSON body instead of an SSE stream
    pub json_response: bool,

    /// OpenWeather API base URL
    pub api_base_url: String,

    /// Zone used to split forecast entries into calendar days.
    /// `None` uses the server's local zone.
    pub utc_offset: Option<FixedOffset>,

    /// Per-request timeout for upstream calls
    pub request_timeout: Duration,
}

impl Config {
    /// Create a configuration with default settings for the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }

        Ok(Self {
            api_key,
            port: DEFAULT_PORT,
            log_level: LevelFilter::INFO,
            json_response: false,
            api_base_url: openweather::API_BASE_URL.to_string(),
            utc_offset: None,
            request_timeout: openweather::REQUEST_TIMEOUT,
        })
    }
}

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Parse a log level name (DEBUG, INFO, WARNING, ERROR, CRITICAL)
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    let filter = match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "CRITICAL" => LevelFilter::ERROR,
        _ => {
            return Err(ConfigError::InvalidLogLevel {
                level: level.to_string(),
            }
            .into())
        }
    };
    Ok(filter)
}

/// Parse a UTC offset such as `+08:00`, `-0530` or `+8`
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let invalid = || ConfigError::InvalidUtcOffset {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid().into()),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid().into());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(|| invalid().into())
}

/// OpenWeather API constants
pub mod openweather {
    use std::time::Duration;

    /// Base URL for the OpenWeather 2.5 API
    pub const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

    /// Current conditions endpoint
    pub const CURRENT_PATH: &str = "weather";

    /// 3-hourly forecast endpoint
    pub const FORECAST_PATH: &str = "forecast";

    /// Celsius
    pub const UNITS: &str = "metric";

    /// Chinese descriptions
    pub const LANG: &str = "zh_cn";

    /// 7 days * 8 samples per day
    pub const FORECAST_SAMPLE_COUNT: u32 = 56;

    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
}
