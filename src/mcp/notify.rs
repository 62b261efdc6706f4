//! Client-facing log notifications
//!
//! The tool handler reports progress through a [`Notifier`]. On the streamed
//! transport each message becomes a `notifications/message` event on the
//! request's SSE stream; in buffered mode it can only be logged locally.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::mcp::types::{
    JsonRpcMessage, JsonRpcNotification, LoggingLevel, LoggingMessageParams, RequestId,
};

/// Receiver of leveled log messages emitted while a request is handled
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn log(&self, level: LoggingLevel, logger: &str, data: &str);

    async fn info(&self, logger: &str, data: &str) {
        self.log(LoggingLevel::Info, logger, data).await
    }

    async fn error(&self, logger: &str, data: &str) {
        self.log(LoggingLevel::Error, logger, data).await
    }
}

/// Forwards notifications into the SSE stream of the originating request
pub struct ChannelNotifier {
    request_id: RequestId,
    sender: UnboundedSender<JsonRpcMessage>,
}

impl ChannelNotifier {
    pub fn new(request_id: RequestId, sender: UnboundedSender<JsonRpcMessage>) -> Self {
        Self { request_id, sender }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn log(&self, level: LoggingLevel, logger: &str, data: &str) {
        trace_message(&self.request_id, level, logger, data);

        let notification = JsonRpcNotification::log_message(&LoggingMessageParams {
            level,
            logger: Some(logger.to_string()),
            data: Value::String(data.to_string()),
        });

        // The stream is gone once the client disconnects.
        if self
            .sender
            .send(JsonRpcMessage::Notification(notification))
            .is_err()
        {
            debug!(request_id = %self.request_id, "Dropping notification for closed stream");
        }
    }
}

/// Logs notifications locally when there is no stream to carry them
pub struct TracingNotifier {
    request_id: RequestId,
}

impl TracingNotifier {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn log(&self, level: LoggingLevel, logger: &str, data: &str) {
        trace_message(&self.request_id, level, logger, data);
    }
}

fn trace_message(request_id: &RequestId, level: LoggingLevel, logger: &str, data: &str) {
    match level {
        LoggingLevel::Debug => debug!(target: "weather", %request_id, logger, "{}", data),
        LoggingLevel::Info | LoggingLevel::Notice => {
            info!(target: "weather", %request_id, logger, "{}", data)
        }
        LoggingLevel::Warning => warn!(target: "weather", %request_id, logger, "{}", data),
        LoggingLevel::Error
        | LoggingLevel::Critical
        | LoggingLevel::Alert
        | LoggingLevel::Emergency => error!(target: "weather", %request_id, logger, "{}", data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_channel_notifier_emits_log_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = ChannelNotifier::new(RequestId::Number(7), tx);

        notifier.info("weather", "Fetching weather for Beijing…").await;
        notifier.error("weather", "boom").await;

        let first = serde_json::to_value(rx.recv().await.unwrap()).unwrap();
        assert_eq!(first["method"], "notifications/message");
        assert_eq!(first["params"]["level"], "info");
        assert_eq!(first["params"]["logger"], "weather");
        assert_eq!(first["params"]["data"], "Fetching weather for Beijing…");

        let second = serde_json::to_value(rx.recv().await.unwrap()).unwrap();
        assert_eq!(second["params"]["level"], "error");
        assert_eq!(second["params"]["data"], "boom");
    }

    #[tokio::test]
    async fn test_channel_notifier_ignores_closed_stream() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let notifier = ChannelNotifier::new(RequestId::String("abc".to_string()), tx);
        notifier.info("weather", "nobody is listening").await;
    }
}
