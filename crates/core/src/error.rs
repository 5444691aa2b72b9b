//! Error types for kgbridge.

use std::time::Duration;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Every failure a tool call or startup can produce.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A required tool argument is missing or empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The tool name resolved to an identifier that is not in the registry.
    #[error("Knowledge graph not found: {0}")]
    NotFound(String),

    /// The tool name matches none of the known tool patterns.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The remote query did not complete within its deadline.
    #[error("Query timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The remote endpoint answered with a non-2xx status.
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// Network-level failure (DNS, refused connection, reset, ...).
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered 2xx but the body is not a SPARQL JSON result.
    #[error("Failed to parse query results: {0}")]
    Parse(#[source] serde_json::Error),

    /// The call was cancelled before the endpoint answered.
    #[error("Query cancelled")]
    Cancelled,

    /// Invalid registry or configuration data.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl BridgeError {
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout {
            timeout_ms: millis(duration),
        }
    }

    /// Stable tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::UnknownTool(_) => "unknown_tool",
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http",
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
            Self::Cancelled => "cancelled",
            Self::Config(_) => "config",
        }
    }

    /// Whether the failure came from the remote side rather than the caller.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Http { .. } | Self::Transport(_) | Self::Parse(_)
        )
    }
}
