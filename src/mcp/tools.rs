//! MCP Tool definitions and handlers
//!
//! Defines the weather tools, validates their arguments, and renders the
//! fetched data as the text returned to the caller.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{Result, ToolError};
use crate::mcp::notify::Notifier;
use crate::mcp::types::Tool;
use crate::weather::types::{DailyForecast, WeatherSnapshot};
use crate::weather::WeatherSource;

/// Logger name attached to client notifications
pub const LOGGER: &str = "weather";

/// The tools exposed by this server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherTool {
    CurrentWeather,
    WeeklyForecast,
}

impl WeatherTool {
    pub const ALL: [WeatherTool; 2] = [WeatherTool::CurrentWeather, WeatherTool::WeeklyForecast];

    pub fn name(&self) -> &'static str {
        match self {
            WeatherTool::CurrentWeather => "get-weather",
            WeatherTool::WeeklyForecast => "get-weekly-weather",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    fn description(&self) -> &'static str {
        match self {
            WeatherTool::CurrentWeather => "查询指定城市的实时天气（OpenWeather 数据）",
            WeatherTool::WeeklyForecast => "查询指定城市未来一周的天气预报（OpenWeather 数据）",
        }
    }

    /// Catalog entry for `tools/list`
    pub fn definition(&self) -> Tool {
        Tool {
            name: self.name().to_string(),
            description: Some(self.description().to_string()),
            input_schema: location_schema(),
        }
    }
}

/// Arguments shared by both tools
#[derive(Debug, Default, Deserialize, Validate)]
struct LocationArgs {
    #[validate(required, length(min = 1))]
    location: Option<String>,
}

impl LocationArgs {
    /// Extract the required, non-empty `location` argument
    fn parse(args: Value) -> std::result::Result<String, ToolError> {
        let args: LocationArgs = match args {
            Value::Null => LocationArgs::default(),
            Value::Object(_) => serde_json::from_value(args)
                .map_err(|e| ToolError::invalid_argument(e.to_string()))?,
            _ => return Err(ToolError::invalid_argument("arguments must be an object")),
        };

        args.validate()
            .map_err(|_| ToolError::invalid_argument("'location' is required in arguments"))?;

        args.location
            .ok_or_else(|| ToolError::invalid_argument("'location' is required in arguments"))
    }
}

/// Tool handler
pub struct ToolHandler {
    source: Arc<dyn WeatherSource>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        WeatherTool::ALL.iter().map(WeatherTool::definition).collect()
    }

    /// Call a tool by name, returning the rendered text.
    ///
    /// Validation failures return before anything is sent to `notifier`.
    /// Fetch failures are reported to `notifier` and then returned unchanged.
    pub async fn call_tool(&self, name: &str, args: Value, notifier: &dyn Notifier) -> Result<String> {
        let city = LocationArgs::parse(args)?;
        let tool = WeatherTool::from_name(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;

        match tool {
            WeatherTool::CurrentWeather => self.handle_current(&city, notifier).await,
            WeatherTool::WeeklyForecast => self.handle_weekly(&city, notifier).await,
        }
    }

    // ==================== Tool Handlers ====================

    async fn handle_current(&self, city: &str, notifier: &dyn Notifier) -> Result<String> {
        notifier
            .info(LOGGER, &format!("Fetching weather for {}…", city))
            .await;

        let snapshot = report_failure(self.source.current(city).await, notifier).await?;

        notifier
            .info(LOGGER, "Weather data fetched successfully!")
            .await;

        Ok(render_current(&snapshot))
    }

    async fn handle_weekly(&self, city: &str, notifier: &dyn Notifier) -> Result<String> {
        notifier
            .info(LOGGER, &format!("Fetching 7-day weather forecast for {}…", city))
            .await;

        let forecasts = report_failure(self.source.forecast(city).await, notifier).await?;

        notifier
            .info(
                LOGGER,
                &format!("Fetched {} days of forecast data!", forecasts.len()),
            )
            .await;

        Ok(render_weekly(city, &forecasts))
    }
}

/// Send the error of a failed fetch to the client before handing it back
async fn report_failure<T>(result: Result<T>, notifier: &dyn Notifier) -> Result<T> {
    if let Err(e) = &result {
        notifier.error(LOGGER, &e.to_string()).await;
    }
    result
}

// ==================== Rendering ====================

/// One-line summary of current conditions
pub fn render_current(snapshot: &WeatherSnapshot) -> String {
    format!(
        "{}：{}，温度 {}°C，体感 {}°C，湿度 {}%。",
        snapshot.city, snapshot.description, snapshot.temp, snapshot.feels_like, snapshot.humidity
    )
}

/// Header plus one bullet line per day
pub fn render_weekly(city: &str, forecasts: &[DailyForecast]) -> String {
    let mut lines = vec![format!("{}未来一周天气预报：\n", city)];
    lines.extend(forecasts.iter().map(|day| {
        format!(
            "• {}：{}，温度 {:.1}°C（最低 {:.1}°C，最高 {:.1}°C），湿度 {}%",
            day.date.format("%Y年%m月%d日"),
            day.description,
            day.temp,
            day.temp_min,
            day.temp_max,
            day.humidity
        )
    }));
    lines.join("\n")
}

// ==================== Tool Schemas ====================

fn location_schema() -> Value {
    json!({
        "type": "object",
        "required": ["location"],
        "properties": {
            "location": {
                "type": "string",
                "description": "城市的英文名称，如 'Beijing'"
            }
        }
    })
}
