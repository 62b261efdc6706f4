//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use weather_mcp_server::error::{Result, ToolError};
use weather_mcp_server::mcp::notify::Notifier;
use weather_mcp_server::mcp::types::LoggingLevel;
use weather_mcp_server::weather::types::{DailyForecast, WeatherSnapshot};
use weather_mcp_server::weather::WeatherSource;

/// Canned weather data; fails with `status` when set
#[derive(Default)]
pub struct StubSource {
    pub fail_with: Option<u16>,
    pub calls: AtomicUsize,
}

impl StubSource {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(status) => Err(ToolError::UpstreamHttp {
                status,
                body: r#"{"cod":"404","message":"city not found"}"#.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WeatherSource for StubSource {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot> {
        self.check()?;
        Ok(WeatherSnapshot {
            city: city.to_string(),
            weather: "Clear".to_string(),
            description: "晴".to_string(),
            temp: 20.0,
            feels_like: 19.0,
            humidity: 50,
        })
    }

    async fn forecast(&self, _city: &str) -> Result<Vec<DailyForecast>> {
        self.check()?;
        Ok(vec![
            DailyForecast {
                date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                description: "晴".to_string(),
                temp: 30.0,
                temp_min: 26.04,
                temp_max: 33.96,
                humidity: 45,
            },
            DailyForecast {
                date: NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(),
                description: "雷阵雨".to_string(),
                temp: 27.5,
                temp_min: 24.0,
                temp_max: 29.0,
                humidity: 90,
            },
        ])
    }
}

/// Notifier that remembers every message
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(LoggingLevel, String, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(LoggingLevel, String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn log(&self, level: LoggingLevel, logger: &str, data: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level, logger.to_string(), data.to_string()));
    }
}
