//! Weather MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server for OpenWeather lookups.
//! Serves the `get-weather` and `get-weekly-weather` tools over Streamable HTTP.

use std::sync::Arc;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use weather_mcp_server::config::{openweather, parse_log_level, parse_utc_offset, Config, DEFAULT_PORT};
use weather_mcp_server::error::Result;
use weather_mcp_server::mcp::http;
use weather_mcp_server::mcp::server::McpServer;
use weather_mcp_server::weather::client::WeatherClient;

/// Weather MCP Server
#[derive(Parser)]
#[command(name = "weather-mcp-server")]
#[command(author, version, about = "Run an MCP weather server using Streamable HTTP transport")]
struct Cli {
    /// Port to listen on for HTTP
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// OpenWeather API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Logging level (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(long, default_value = "INFO")]
    log_level: String,

    /// Enable JSON responses instead of SSE streams
    #[arg(long)]
    json_response: bool,

    /// OpenWeather API base URL
    #[arg(long, env = "OPENWEATHER_BASE_URL", default_value = openweather::API_BASE_URL)]
    api_base_url: String,

    /// UTC offset used to group forecasts by day, e.g. +08:00 (defaults to the local zone)
    #[arg(long, env = "WEATHER_UTC_OFFSET", allow_hyphen_values = true)]
    utc_offset: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = Config::new(self.api_key)?;
        config.port = self.port;
        config.log_level = parse_log_level(&self.log_level)?;
        config.json_response = self.json_response;
        config.api_base_url = self.api_base_url;
        config.utc_offset = self.utc_offset.as_deref().map(parse_utc_offset).transpose()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.into_config()?;

    init_logging(config.log_level);

    let client = WeatherClient::new(&config);
    let server = Arc::new(McpServer::new(Arc::new(client)));

    http::serve(server, config.port, config.json_response).await
}

/// `RUST_LOG` takes precedence over `--log-level`
fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
