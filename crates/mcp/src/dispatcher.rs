//! Tool-call dispatch.
//!
//! Resolves a tool name to its target, runs the remote query and formats the
//! result. Every failure ends up in a [`CallToolResult`] with `isError` set;
//! nothing escapes [`Dispatcher::dispatch`].

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{build_catalog, ToolTarget};
use kgbridge_core::{
    format_results, BridgeError, BridgeResult, EndpointRegistry, QueryBackend, QueryOutcome,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct Dispatcher {
    registry: Arc<EndpointRegistry>,
    backend: Arc<dyn QueryBackend>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        backend: Arc<dyn QueryBackend>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            backend,
            timeout,
        }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn list_tools(&self) -> Vec<ToolSchema> {
        build_catalog(&self.registry)
    }

    /// Handle one tool call.
    pub async fn dispatch(
        &self,
        tool_name: &str,
        arguments: &Value,
        cancel: &CancellationToken,
    ) -> CallToolResult {
        debug!(tool = %tool_name, "Dispatching tool call");

        match self.try_dispatch(tool_name, arguments, cancel).await {
            Ok(text) => CallToolResult::success(text),
            Err(e) => {
                warn!(
                    tool = %tool_name,
                    kind = e.kind(),
                    remote = e.is_remote(),
                    error = %e,
                    "Tool call failed"
                );
                CallToolResult::failure(e.to_string())
            }
        }
    }

    async fn try_dispatch(
        &self,
        tool_name: &str,
        arguments: &Value,
        cancel: &CancellationToken,
    ) -> BridgeResult<String> {
        match ToolTarget::resolve(tool_name) {
            ToolTarget::ListKnowledgeGraphs => self.list_knowledge_graphs(),
            ToolTarget::Federated => {
                let query = required_query(arguments)?;
                self.run_query(self.registry.federated_url(), query, cancel)
                    .await
            }
            ToolTarget::Endpoint(id) => {
                let entry = self
                    .registry
                    .get(&id)
                    .ok_or_else(|| BridgeError::NotFound(id.clone()))?;
                let query = required_query(arguments)?;
                self.run_query(&entry.url, query, cancel).await
            }
            ToolTarget::Unknown => Err(BridgeError::UnknownTool(tool_name.to_string())),
        }
    }

    fn list_knowledge_graphs(&self) -> BridgeResult<String> {
        serde_json::to_string_pretty(self.registry.entries()).map_err(BridgeError::Parse)
    }

    async fn run_query(
        &self,
        url: &str,
        query: &str,
        cancel: &CancellationToken,
    ) -> BridgeResult<String> {
        let outcome = self.backend.query(url, query, self.timeout, cancel).await?;
        Ok(render(&outcome))
    }
}

/// Formatted table followed by the response body exactly as received.
fn render(outcome: &QueryOutcome) -> String {
    let table = format_results(Some(&outcome.results));
    format!("{}\n\nRaw JSON response:\n{}", table, outcome.raw)
}

fn required_query(arguments: &Value) -> BridgeResult<&str> {
    match arguments.get("query").and_then(Value::as_str) {
        Some(query) if !query.trim().is_empty() => Ok(query),
        _ => Err(BridgeError::Validation(
            "'query' is required and must be a non-empty string".to_string(),
        )),
    }
}
