//! Outbound SPARQL query execution.
//!
//! One POST per call, no retries. Each call races the request against its own
//! deadline and cancellation token; whichever finishes first drops the other
//! two, which aborts the in-flight request and releases the timer.

use crate::config::BridgeConfig;
use crate::error::{millis, BridgeError, BridgeResult};
use crate::types::QueryOutcome;
use reqwest::{header, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const SPARQL_QUERY_CONTENT_TYPE: &str = "application/sparql-query";
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Something that can run a query against an endpoint URL.
#[async_trait::async_trait]
pub trait QueryBackend: Send + Sync {
    async fn query(
        &self,
        url: &str,
        query: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> BridgeResult<QueryOutcome>;
}

/// HTTP implementation of [`QueryBackend`].
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    client: Client,
}

impl QueryExecutor {
    pub fn new(user_agent: &str) -> BridgeResult<Self> {
        // No client-level timeout: the deadline is enforced per call.
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(BridgeError::Transport)?;
        Ok(Self { client })
    }

    pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
        Self::new(&config.user_agent)
    }

    /// Run `query` against `url`, giving up after `timeout` or when `cancel`
    /// fires.
    pub async fn execute(
        &self,
        url: &str,
        query: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> BridgeResult<QueryOutcome> {
        debug!(url = %url, timeout_ms = millis(timeout), "POST query");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BridgeError::Cancelled),
            _ = tokio::time::sleep(timeout) => Err(BridgeError::timeout(timeout)),
            result = self.send(url, query) => result,
        }
    }

    async fn send(&self, url: &str, query: &str) -> BridgeResult<QueryOutcome> {
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, SPARQL_QUERY_CONTENT_TYPE)
            .header(header::ACCEPT, SPARQL_RESULTS_JSON)
            .body(query.to_owned())
            .send()
            .await
            .map_err(BridgeError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(BridgeError::Transport)?;

        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Endpoint returned error status");
            return Err(BridgeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        QueryOutcome::from_body(body).map_err(BridgeError::Parse)
    }
}

#[async_trait::async_trait]
impl QueryBackend for QueryExecutor {
    async fn query(
        &self,
        url: &str,
        query: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> BridgeResult<QueryOutcome> {
        self.execute(url, query, timeout, cancel).await
    }
}
