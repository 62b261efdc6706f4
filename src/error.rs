//! Error types for the Weather MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use serde_json::json;
use thiserror::Error;

use crate::mcp::types::JsonRpcError;

/// Main error type for the Weather MCP Server
#[derive(Error, Debug)]
pub enum WeatherMcpError {
    /// Tool invocation errors
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors (connect failures, timeouts)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while handling a single tool call
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {message}")]
    InvalidArgument { message: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("OpenWeather request failed with status {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Malformed OpenWeather response: {message}")]
    MalformedResponse { message: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing OpenWeather API key (pass --api-key or set OPENWEATHER_API_KEY)")]
    MissingApiKey,

    #[error("Invalid log level: {level} (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
    InvalidLogLevel { level: String },

    #[error("Invalid UTC offset: {value} (expected e.g. +08:00)")]
    InvalidUtcOffset { value: String },
}

/// Result type alias for Weather MCP operations
pub type Result<T> = std::result::Result<T, WeatherMcpError>;

impl WeatherMcpError {
    /// Whether the caller is responsible (bad arguments, unknown tool)
    /// rather than the upstream service.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            WeatherMcpError::Tool(ToolError::InvalidArgument { .. })
                | WeatherMcpError::Tool(ToolError::UnknownTool { .. })
        )
    }

    /// Short machine-readable tag carried in JSON-RPC error data.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherMcpError::Tool(ToolError::InvalidArgument { .. }) => "invalid_argument",
            WeatherMcpError::Tool(ToolError::UnknownTool { .. }) => "unknown_tool",
            WeatherMcpError::Tool(ToolError::UpstreamHttp { .. }) => "upstream_http",
            WeatherMcpError::Tool(ToolError::MalformedResponse { .. }) => "malformed_response",
            WeatherMcpError::Http(_) => "upstream_transport",
            WeatherMcpError::Config(_) => "config",
            WeatherMcpError::Io(_) => "io",
            WeatherMcpError::Json(_) => "json",
        }
    }

    /// Convert into the JSON-RPC error returned for a failed `tools/call`.
    pub fn to_jsonrpc_error(&self) -> JsonRpcError {
        let mut data = json!({ "kind": self.kind() });
        if let WeatherMcpError::Tool(ToolError::UpstreamHttp { status, .. }) = self {
            data["status"] = json!(status);
        }

        let error = if self.is_caller_fault() {
            JsonRpcError::invalid_params(self.to_string())
        } else {
            JsonRpcError::internal_error(self.to_string())
        };
        error.with_data(data)
    }
}

impl ToolError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ToolError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ToolError::MalformedResponse {
            message: message.into(),
        }
    }
}
