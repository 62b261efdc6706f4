//! Weather MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing OpenWeather lookups.
//! Provides tools for current conditions and a 7-day forecast, served over
//! Streamable HTTP.

pub mod config;
pub mod error;
pub mod mcp;
pub mod weather;

pub use config::Config;
pub use error::{Result, WeatherMcpError};
