//! Transport error definitions.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

/// Why a single attempt against a host failed in a retryable way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// The attempt did not finish within its timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The host answered with a 5xx (or 408).
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other network-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx body that does not match the expected response type.
    #[error("undecodable response body: {0}")]
    Decode(String),

    /// No host is configured for the call category.
    #[error("no host configured for this call category")]
    NoHosts,
}

/// Errors surfaced to callers of the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request was rejected by the API; retrying it unchanged cannot help.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Every eligible host failed, or the overall deadline passed.
    #[error("service unreachable after {attempts} attempt(s): {last_cause}")]
    Unreachable { attempts: u32, last_cause: FailureCause },

    /// The caller cancelled the call.
    #[error("operation cancelled")]
    Cancelled,

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Caller-supplied headers or parameters are malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The client configuration is not usable.
    #[error("invalid client configuration: {0}")]
    Config(#[source] ConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// The input was wrong; the service answered.
    pub fn is_rejected(&self) -> bool {
        matches!(self, TransportError::Rejected { .. })
    }

    /// The service could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Unreachable { .. })
    }

    /// HTTP status of a rejection, or of the last server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Rejected { status, .. } => Some(*status),
            TransportError::Unreachable {
                last_cause: FailureCause::Server { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
