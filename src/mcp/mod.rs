//! MCP (Model Context Protocol) module
//!
//! Implements the MCP server protocol for tool invocation over Streamable HTTP.

pub mod http;
pub mod notify;
pub mod server;
pub mod tools;
pub mod types;
