//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport. Requests
//! are read line by line and handled in order; every outgoing line (responses
//! and progress notifications) goes through one writer task.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::error::{InfraNodusMcpError, McpError, Result};
use crate::infranodus::client::InfraNodusApi;
use crate::infranodus::progress::ProgressSink;
use crate::mcp::progress::ChannelProgress;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;
use crate::mcp::{prompts, resources};

/// MCP Server info
const SERVER_NAME: &str = "infranodus";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTRUCTIONS: &str = "Use the InfraNodus tools to build knowledge graphs from text, find \
topical clusters and content gaps, generate research questions, compare texts, analyze search \
intent and keep a graph-based memory.";

/// MCP Server for InfraNodus
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,

    /// Whether the client confirmed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(api: Arc<dyn InfraNodusApi>) -> Self {
        Self {
            tool_handler: ToolHandler::new(api),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server on stdio until stdin closes or Ctrl-C
    pub async fn run_stdio(&mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(line) = rx.recv().await {
                let written = async {
                    stdout.write_all(line.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await
                };
                if let Err(e) = written.await {
                    tracing::error!("Failed to write to stdout: {}", e);
                    break;
                }
            }
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        tracing::info!("InfraNodus MCP server listening on stdio");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::info!("stdin closed, shutting down");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(response) = self.handle_message(&line, &tx).await {
                        send(&tx, &response);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, shutting down");
                    break;
                }
            }
        }

        drop(tx);
        if let Err(e) = writer.await {
            tracing::error!("Writer task failed: {}", e);
        }

        Ok(())
    }

    /// Handle one incoming JSON-RPC line; notifications yield no response
    pub async fn handle_message(
        &mut self,
        message: &str,
        out: &UnboundedSender<String>,
    ) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                Some(id),
                JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        tracing::debug!("Request {}", request.method);
        let response = match request.method.as_str() {
            methods::INITIALIZE => reply(id, Ok(self.handle_initialize(&request))),
            methods::PING => reply(id, Ok(serde_json::json!({}))),
            methods::LIST_TOOLS => reply(
                id,
                Ok(ListToolsResult {
                    tools: self.tool_handler.list_tools(),
                }),
            ),
            methods::CALL_TOOL => reply(id, self.handle_call_tool(&request, out).await),
            methods::LIST_RESOURCES => reply(
                id,
                Ok(ListResourcesResult {
                    resources: resources::list_resources(),
                }),
            ),
            methods::READ_RESOURCE => reply(
                id,
                parse_params::<ReadResourceParams>(&request)
                    .and_then(|p| resources::read_resource(&p.uri)),
            ),
            methods::LIST_PROMPTS => reply(
                id,
                Ok(ListPromptsResult {
                    prompts: prompts::list_prompts(),
                }),
            ),
            methods::GET_PROMPT => reply(
                id,
                parse_params::<GetPromptParams>(&request)
                    .and_then(|p| prompts::get_prompt(&p.name, &p.arguments)),
            ),
            _ => JsonRpcResponse::error(Some(id), JsonRpcError::method_not_found(&request.method)),
        };

        Some(response)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            methods::INITIALIZED => {
                self.initialized = true;
                tracing::info!("Client initialized");
            }
            methods::CANCELLED => tracing::debug!("Client cancelled a request"),
            other => tracing::debug!("Ignoring notification {}", other),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, request: &JsonRpcRequest) -> InitializeResult {
        let params: InitializeParams = request
            .params
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!("Client: {} {}", client.name, client.version);
        }

        let protocol_version = params
            .protocol_version
            .filter(|v| SUPPORTED_VERSIONS.contains(&v.as_str()))
            .unwrap_or_else(|| MCP_VERSION.to_string());

        InitializeResult {
            protocol_version,
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                resources: Some(ResourcesCapability::default()),
                prompts: Some(PromptsCapability::default()),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    /// Handle call tool request; tool failures are results, not protocol errors
    async fn handle_call_tool(
        &self,
        request: &JsonRpcRequest,
        out: &UnboundedSender<String>,
    ) -> Result<CallToolResult> {
        let params: CallToolParams = parse_params(request)?;

        let progress = params
            .progress_token()
            .map(|token| ChannelProgress::new(token, out.clone()));
        let sink = progress.as_ref().map(|p| p as &dyn ProgressSink);

        Ok(self
            .tool_handler
            .call_tool(&params.name, params.arguments, sink)
            .await)
    }
}

fn parse_params<P: serde::de::DeserializeOwned>(request: &JsonRpcRequest) -> Result<P> {
    let params = request.params.clone().unwrap_or(Value::Null);
    serde_json::from_value(params).map_err(|e| {
        McpError::InvalidParams {
            message: e.to_string(),
        }
        .into()
    })
}

fn reply<T: Serialize>(id: RequestId, result: Result<T>) -> JsonRpcResponse {
    let value = result.and_then(|r| Ok(serde_json::to_value(r)?));
    match value {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(Some(id), rpc_error(&e)),
    }
}

fn rpc_error(err: &InfraNodusMcpError) -> JsonRpcError {
    match err {
        InfraNodusMcpError::Mcp(inner) => JsonRpcError::invalid_params(inner.to_string()),
        other => JsonRpcError::internal_error(other.to_string()),
    }
}

fn send(out: &UnboundedSender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(line) => {
            if out.send(line).is_err() {
                tracing::error!("Output channel closed");
            }
        }
        Err(e) => tracing::error!("Failed to encode response: {}", e),
    }
}
