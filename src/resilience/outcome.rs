//! Attempt outcome classification.
//!
//! - 2xx: success once the body decodes, otherwise retryable
//! - 4xx except 408: application error, surfaced as is, host stays up
//! - 408, 5xx, anything else, timeouts and network errors: retryable

use reqwest::StatusCode;

use crate::transport::error::FailureCause;

/// Result of one attempt against one host.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Success(T),
    ApplicationError { status: u16, message: String },
    RetryableError(FailureCause),
}

impl<T> RetryOutcome<T> {
    /// Short name used in logs and metric labels.
    pub fn label(&self) -> &'static str {
        match self {
            RetryOutcome::Success(_) => "success",
            RetryOutcome::ApplicationError { .. } => "application_error",
            RetryOutcome::RetryableError(_) => "retryable_error",
        }
    }
}

/// Coarse class of an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Application,
    Retryable,
}

pub fn classify_status(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if status.is_client_error() && status != StatusCode::REQUEST_TIMEOUT {
        StatusClass::Application
    } else {
        StatusClass::Retryable
    }
}

/// Classify a reqwest error raised before a status was received.
pub fn classify_transport_error(err: &reqwest::Error) -> FailureCause {
    if err.is_timeout() {
        FailureCause::Network(format!("request timed out: {err}"))
    } else if err.is_connect() {
        FailureCause::Connect(err.to_string())
    } else {
        FailureCause::Network(err.to_string())
    }
}
