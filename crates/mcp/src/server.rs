// MCP server: newline-delimited JSON-RPC over stdio
//
// Requests are read one line at a time. `tools/call` runs on its own task so
// slow endpoints never block the reader; every response goes through one
// writer task, so responses may come back out of order.

use crate::dispatcher::Dispatcher;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult,
};
use anyhow::{Context, Result};
use futures::{FutureExt, SinkExt, StreamExt};
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Longest accepted request line (queries can be large, but not unbounded).
const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    shutdown: CancellationToken,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancelling this token stops reading and aborts in-flight tool calls.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serve on the process's stdin/stdout.
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve until the reader hits EOF or shutdown is requested, then wait for
    /// in-flight calls to write their responses.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            let mut sink = FramedWrite::new(writer, LinesCodec::new());
            while let Some(response) = rx.recv().await {
                let line = serde_json::to_string(&response)?;
                debug!("Sending: {}", line);
                sink.send(line).await.context("Failed to write to stdout")?;
            }
            Ok::<(), anyhow::Error>(())
        });

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                next = lines.next() => next,
            };

            match next {
                None => {
                    debug!("Input closed");
                    break;
                }
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    debug!("Received: {}", line);
                    self.handle_line(&line, &tx);
                }
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    warn!(max = MAX_LINE_LENGTH, "Request line too long, discarded");
                    let _ = tx.send(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::invalid_request(),
                    ));
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        drop(tx);
        writer_task.await.context("Writer task panicked")??;
        Ok(())
    }

    fn handle_line(&self, line: &str, tx: &mpsc::UnboundedSender<JsonRpcResponse>) {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid JSON-RPC message: {}", e);
                let _ = tx.send(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()));
                return;
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return;
        }
        let id = request.id.clone().unwrap_or_default();

        if request.jsonrpc != "2.0" {
            let _ = tx.send(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
            return;
        }

        if request.method == "tools/call" {
            self.spawn_tool_call(id, request.params, tx.clone());
        } else {
            let _ = tx.send(self.handle_request(id, &request.method, request.params.as_ref()));
        }
    }

    /// Answer every method except `tools/call`.
    pub fn handle_request(
        &self,
        id: Value,
        method: &str,
        params: Option<&Value>,
    ) -> JsonRpcResponse {
        match method {
            "initialize" => {
                if let Some(client) = params
                    .and_then(|p| serde_json::from_value::<InitializeParams>(p.clone()).ok())
                {
                    info!(
                        client = %client.client_info.name,
                        version = %client.client_info.version,
                        protocol = %client.protocol_version,
                        "Client connected"
                    );
                }
                JsonRpcResponse::success(id, InitializeResult::current())
            }
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.dispatcher.list_tools(),
                },
            ),
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        }
    }

    fn spawn_tool_call(
        &self,
        id: Value,
        params: Option<Value>,
        tx: mpsc::UnboundedSender<JsonRpcResponse>,
    ) {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                let _ = tx.send(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)),
                ));
                return;
            }
            None => {
                let _ = tx.send(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing params for tools/call"),
                ));
                return;
            }
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let cancel = self.shutdown.child_token();

        tokio::spawn(async move {
            let result = AssertUnwindSafe(dispatcher.dispatch(
                &params.name,
                &params.arguments,
                &cancel,
            ))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                error!(tool = %params.name, "Tool call panicked");
                CallToolResult::failure(format!("Internal error while running {}", params.name))
            });

            if tx.send(JsonRpcResponse::success(id, result)).is_err() {
                warn!(tool = %params.name, "Response dropped, writer closed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgbridge_core::{EndpointRegistry, QueryExecutor};
    use serde_json::json;
    use std::time::Duration;

    fn server() -> McpServer {
        let registry = Arc::new(EndpointRegistry::with_defaults().unwrap());
        let executor = Arc::new(QueryExecutor::new("kgbridge-test").unwrap());
        McpServer::new(Dispatcher::new(registry, executor, Duration::from_secs(30)))
    }

    #[test]
    fn test_initialize() {
        let server = server();
        let response = server.handle_request(
            json!(1),
            "initialize",
            Some(&json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "1.0"}
            })),
        );

        let result = response.result.unwrap();
        assert!(result.get("protocolVersion").is_some());
        assert_eq!(result["serverInfo"]["name"], "kgbridge");
    }

    #[test]
    fn test_list_tools() {
        let server = server();
        let response = server.handle_request(json!(2), "tools/list", None);

        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), server.dispatcher.registry().len() + 2);
        assert_eq!(tools[0]["name"], "list_knowledge_graphs");
        assert!(tools.iter().any(|t| t["name"] == "query_wikidata"));
    }

    #[test]
    fn test_ping() {
        let response = server().handle_request(json!("p"), "ping", None);
        assert_eq!(response.result, Some(json!({})));
        assert_eq!(response.id, json!("p"));
    }

    #[test]
    fn test_unknown_method() {
        let response = server().handle_request(json!(3), "resources/list", None);
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert!(error.message.contains("resources/list"));
    }

    #[tokio::test]
    async fn test_tool_call_without_params_is_invalid_params() {
        let server = server();
        let (tx, mut rx) = mpsc::unbounded_channel();

        server.handle_line(r#"{"jsonrpc":"2.0","id":9,"method":"tools/call"}"#, &tx);

        let response = rx.recv().await.unwrap();
        assert_eq!(response.id, json!(9));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let server = server();
        let (tx, mut rx) = mpsc::unbounded_channel();

        server.handle_line("{not json", &tx);

        let response = rx.recv().await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = server();
        let (tx, mut rx) = mpsc::unbounded_channel();

        server.handle_line(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            &tx,
        );
        drop(tx);

        assert!(rx.recv().await.is_none());
    }
}
