//! MCP Server implementation
//!
//! Routes JSON-RPC requests to the tool handler. The server keeps no
//! per-client state, so one instance is shared by every HTTP request.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::mcp::notify::Notifier;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;
use crate::weather::WeatherSource;

/// MCP Server info
const SERVER_NAME: &str = "mcp-streamable-http-weather";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for weather lookups
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self {
            tool_handler: ToolHandler::new(source),
        }
    }

    /// Handle a JSON-RPC request, sending progress for tool calls to `notifier`
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        notifier: &dyn Notifier,
    ) -> JsonRpcResponse {
        debug!(method = %request.method, id = %request.id, "Handling request");

        match request.method.as_str() {
            methods::INITIALIZE => match self.handle_initialize(&request) {
                Ok(result) => JsonRpcResponse::success(request.id, result),
                Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
            },
            methods::PING => JsonRpcResponse::success(request.id, serde_json::json!({})),
            methods::LIST_TOOLS => match self.handle_list_tools() {
                Ok(result) => JsonRpcResponse::success(request.id, result),
                Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
            },
            methods::CALL_TOOL => self.handle_call_tool(request, notifier).await,
            _ => JsonRpcResponse::error(
                request.id,
                JsonRpcError::method_not_found(&request.method),
            ),
        }
    }

    /// Handle a client notification; none of them require action
    pub fn handle_notification(&self, notification: &JsonRpcNotification) {
        match notification.method.as_str() {
            methods::INITIALIZED => debug!("Client initialized"),
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, request: &JsonRpcRequest) -> Result<Value> {
        let params: InitializeParams = match &request.params {
            Some(p) => serde_json::from_value(p.clone()).unwrap_or_else(|e| {
                debug!(error = %e, "Malformed initialize params, using defaults");
                InitializeParams::default()
            }),
            None => InitializeParams::default(),
        };

        let protocol_version = if SUPPORTED_MCP_VERSIONS.contains(&params.protocol_version.as_str()) {
            params.protocol_version
        } else {
            MCP_VERSION.to_string()
        };

        let result = InitializeResult {
            protocol_version,
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                logging: Some(LoggingCapability {}),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, request: JsonRpcRequest, notifier: &dyn Notifier) -> JsonRpcResponse {
        let params: CallToolParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid tool parameters: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing tool parameters"),
                );
            }
        };

        let text = match self
            .tool_handler
            .call_tool(&params.name, params.arguments, notifier)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(tool = %params.name, error = %e, "Tool call failed");
                return JsonRpcResponse::error(request.id, e.to_jsonrpc_error());
            }
        };

        match serde_json::to_value(CallToolResult::text(text)) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}
