//! Error types for the query pipeline.

use serde::Serialize;

use crate::trace::DebugTrace;

/// Why a single endpoint attempt failed.
///
/// Attempt failures are recorded in the trace and turned into "try the next
/// candidate"; they only reach callers folded into
/// [`DispatchError::AllStrategiesExhausted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// The attempt exceeded its time budget and was cancelled.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// No HTTP response was received (network, DNS, TLS or CORS level).
    #[error("transport failure: {message}")]
    TransportFailure { message: String, cors_likely: bool },

    /// The endpoint answered with a non-success status.
    #[error("upstream error (HTTP {status}): {message}")]
    UpstreamError { status: u16, message: String },

    /// The endpoint answered successfully but the body was not usable JSON.
    #[error("malformed upstream response: {message}")]
    MalformedUpstreamResponse { message: String },
}

impl FailureKind {
    /// Short class name used in traces and CLI output.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::TransportFailure { .. } => "transport_failure",
            Self::UpstreamError { .. } => "upstream_error",
            Self::MalformedUpstreamResponse { .. } => "malformed_upstream_response",
        }
    }
}

/// Process exit codes for dispatcher failures. `quest` re-exports these
/// next to its own codes; values must stay distinct across both sets.
pub mod exit_codes {
    pub const INVALID_QUERY: i32 = 3;
    pub const CLIENT_ERROR: i32 = 4;
    pub const ALL_STRATEGIES_EXHAUSTED: i32 = 5;
}

/// Dispatcher errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Empty or whitespace-only statement. Never reaches the network.
    #[error("invalid query: statement is empty")]
    InvalidQuery,

    /// Every endpoint failed and the mock catalog had no entry.
    #[error("all strategies exhausted after {} attempt(s){}", trace.len(), last_error.as_ref().map(|e| format!(": {e}")).unwrap_or_default())]
    AllStrategiesExhausted {
        trace: DebugTrace,
        last_error: Option<FailureKind>,
    },

    /// The HTTP client could not be constructed.
    #[error("client error: {message}")]
    Client { message: String },
}

impl DispatchError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidQuery => exit_codes::INVALID_QUERY,
            Self::Client { .. } => exit_codes::CLIENT_ERROR,
            Self::AllStrategiesExhausted { .. } => exit_codes::ALL_STRATEGIES_EXHAUSTED,
        }
    }

    /// Attempts made before the failure, if any.
    pub fn trace(&self) -> Option<&DebugTrace> {
        match self {
            Self::AllStrategiesExhausted { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Client {
            message: err.to_string(),
        }
    }
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
