//! Streamable HTTP transport
//!
//! Serves MCP at `POST /mcp`. Requests are answered either with a single
//! JSON body or with an SSE stream that carries the request's log
//! notifications followed by its response. No sessions are kept.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::UnboundedReceiverStream, StreamExt};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::mcp::notify::{ChannelNotifier, TracingNotifier};
use crate::mcp::server::McpServer;
use crate::mcp::types::{JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, RequestId};

/// Path the MCP endpoint is mounted at
pub const MCP_PATH: &str = "/mcp";

const JSON_MIME: &str = "application/json";
const SSE_MIME: &str = "text/event-stream";

#[derive(Clone)]
struct AppState {
    server: Arc<McpServer>,
    json_response: bool,
}

/// Build the router serving the MCP endpoint
pub fn router(server: Arc<McpServer>, json_response: bool) -> Router {
    Router::new()
        .route(MCP_PATH, post(handle_post))
        .with_state(AppState {
            server,
            json_response,
        })
}

/// Bind `port` on all interfaces and serve until Ctrl-C
pub async fn serve(server: Arc<McpServer>, port: u16, json_response: bool) -> Result<()> {
    let app = router(server, json_response);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let mode = if json_response { "json" } else { "sse" };
    info!(%addr, path = MCP_PATH, mode, "Weather MCP server started! 🚀");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Weather MCP server shutting down…");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn handle_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if !is_json_content(&headers) {
        return error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            JsonRpcError::invalid_request("Unsupported Media Type: Content-Type must be application/json"),
        );
    }

    if !accepts_response(&headers, state.json_response) {
        let expected = if state.json_response {
            JSON_MIME.to_string()
        } else {
            format!("{} and {}", JSON_MIME, SSE_MIME)
        };
        return error_response(
            StatusCode::NOT_ACCEPTABLE,
            JsonRpcError::invalid_request(format!("Not Acceptable: client must accept {}", expected)),
        );
    }

    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                JsonRpcError::parse_error(format!("Parse error: {}", e)),
            );
        }
    };

    let message: JsonRpcMessage = match serde_json::from_value(value) {
        Ok(message) => message,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                JsonRpcError::invalid_request(format!("Invalid Request: {}", e)),
            );
        }
    };

    match message {
        JsonRpcMessage::Request(request) if state.json_response => {
            let notifier = TracingNotifier::new(request.id.clone());
            let response = state.server.handle_request(request, &notifier).await;
            Json(response).into_response()
        }
        JsonRpcMessage::Request(request) => stream_response(state.server, request),
        JsonRpcMessage::Notification(notification) => {
            state.server.handle_notification(&notification);
            StatusCode::ACCEPTED.into_response()
        }
        JsonRpcMessage::Response(response) => {
            debug!(id = %response.id, "Ignoring client response");
            StatusCode::ACCEPTED.into_response()
        }
    }
}

/// Answer `request` with an SSE stream: notifications first, then the response
fn stream_response(server: Arc<McpServer>, request: JsonRpcRequest) -> Response {
    let (tx, rx) = mpsc::unbounded_channel();

    let handler = tokio::spawn(async move {
        let notifier = ChannelNotifier::new(request.id.clone(), tx.clone());
        let response = server.handle_request(request, &notifier).await;
        if tx.send(JsonRpcMessage::Response(response)).is_err() {
            debug!("Client went away before the response was sent");
        }
    });

    // The stream ends once the handler drops its senders.
    let guard = AbortOnDrop(handler);
    let stream = UnboundedReceiverStream::new(rx).map(move |message| {
        let _ = &guard;
        Event::default().event("message").json_data(&message)
    });

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Aborts the request handler (and its upstream fetch) when the client
/// drops the SSE stream
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn error_response(status: StatusCode, error: JsonRpcError) -> Response {
    let body = JsonRpcResponse::error(RequestId::String("server-error".to_string()), error);
    (status, Json(body)).into_response()
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase().starts_with(JSON_MIME))
        .unwrap_or(false)
}

/// Whether the `Accept` header allows the response format we are going to use
fn accepts_response(headers: &HeaderMap, json_response: bool) -> bool {
    let media_types: Vec<String> = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .collect();

    let accepts = |wanted: &str, family: &str| {
        media_types
            .iter()
            .any(|m| m == wanted || m == family || m == "*/*")
    };

    let json = accepts(JSON_MIME, "application/*");
    let sse = accepts(SSE_MIME, "text/*");

    if json_response {
        json
    } else {
        json && sse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_accepts_json_mode() {
        assert!(accepts_response(&headers_with_accept("application/json"), true));
        assert!(accepts_response(&headers_with_accept("*/*"), true));
        assert!(!accepts_response(&headers_with_accept("text/event-stream"), true));
        assert!(!accepts_response(&HeaderMap::new(), true));
    }

    #[test]
    fn test_accepts_sse_mode() {
        assert!(accepts_response(
            &headers_with_accept("application/json, text/event-stream"),
            false
        ));
        assert!(accepts_response(
            &headers_with_accept("application/json;q=0.9, text/event-stream;q=1.0"),
            false
        ));
        assert!(!accepts_response(&headers_with_accept("application/json"), false));
    }

    #[test]
    fn test_json_content_type() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json_content(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json_content(&headers));
    }
}
