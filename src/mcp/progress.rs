//! Progress notifications over the server's output channel

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::infranodus::progress::ProgressSink;
use crate::mcp::types::{methods, JsonRpcNotification, ProgressParams};

/// Sends `notifications/progress` for one tool call
pub struct ChannelProgress {
    token: Value,
    sender: UnboundedSender<String>,
}

impl ChannelProgress {
    pub fn new(token: Value, sender: UnboundedSender<String>) -> Self {
        Self { token, sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, percentage: u8, message: &str) {
        let params = ProgressParams {
            progress_token: self.token.clone(),
            progress: percentage,
            total: 100,
            message: Some(message.to_string()),
        };
        let notification = match serde_json::to_value(params) {
            Ok(params) => JsonRpcNotification::new(methods::PROGRESS, params),
            Err(e) => {
                tracing::debug!("Could not encode progress: {}", e);
                return;
            }
        };
        match serde_json::to_string(&notification) {
            Ok(line) => {
                if self.sender.send(line).is_err() {
                    tracing::debug!("Output channel closed, progress dropped");
                }
            }
            Err(e) => tracing::debug!("Could not encode progress: {}", e),
        }
    }
}
