//! Retry with failover across the ranked host list.
//!
//! # Responsibilities
//! - Walk the eligible hosts of a call category in priority order
//! - Bound each attempt by an escalating timeout
//! - Fail over on retryable outcomes, stop on success or application errors
//! - Feed every outcome back into the host registry
//!
//! # Design Decisions
//! - No delay between attempts: the next attempt goes to a different host
//! - 4xx answers short-circuit; the host answered, the request was wrong
//! - Exhaustion reports the last underlying cause
//! - No attempt outlives the overall deadline

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::TimeoutConfig;
use crate::host::{CallType, HostRegistry, StatefulHost};
use crate::observability::metrics;
use crate::resilience::context::AttemptContext;
use crate::resilience::outcome::RetryOutcome;
use crate::transport::error::{FailureCause, TransportError, TransportResult};

/// Drives one logical call across hosts.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    registry: Arc<HostRegistry>,
    timeouts: TimeoutConfig,
}

impl RetryStrategy {
    pub fn new(registry: Arc<HostRegistry>, timeouts: TimeoutConfig) -> Self {
        Self { registry, timeouts }
    }

    pub fn registry(&self) -> &Arc<HostRegistry> {
        &self.registry
    }

    /// Fresh attempt context for a call category.
    ///
    /// `timeout_override` replaces the category's base timeout.
    pub fn context(&self, call_type: CallType, timeout_override: Option<Duration>) -> AttemptContext {
        let base = timeout_override.unwrap_or_else(|| self.timeouts.base_for(call_type));
        AttemptContext::new(
            self.registry.list_hosts(call_type),
            base,
            self.timeouts.max(),
            self.timeouts.total(),
        )
    }

    /// Run `op` against hosts until one succeeds, one rejects the request,
    /// or every host failed.
    ///
    /// `op` receives the host and the timeout the attempt is bounded by.
    pub async fn attempt<T, F, Fut>(
        &self,
        call_type: CallType,
        timeout_override: Option<Duration>,
        mut op: F,
    ) -> TransportResult<T>
    where
        F: FnMut(Arc<StatefulHost>, Duration) -> Fut,
        Fut: Future<Output = RetryOutcome<T>>,
    {
        let mut ctx = self.context(call_type, timeout_override);
        let mut last_cause = FailureCause::NoHosts;

        while let Some((host, timeout)) = ctx.next_attempt() {
            let started = Instant::now();
            let outcome = match tokio::time::timeout(timeout, op(host.clone(), timeout)).await {
                Ok(outcome) => outcome,
                Err(_) => RetryOutcome::RetryableError(FailureCause::Timeout(timeout)),
            };
            metrics::record_attempt(&host.label(), outcome.label(), started);

            match outcome {
                RetryOutcome::Success(value) => {
                    tracing::debug!(
                        host = %host.label(),
                        attempt = ctx.attempts(),
                        elapsed = ?started.elapsed(),
                        "Attempt succeeded"
                    );
                    self.registry.report_success(&host);
                    return Ok(value);
                }
                RetryOutcome::ApplicationError { status, message } => {
                    tracing::debug!(host = %host.label(), status, message = %message, "Request rejected");
                    return Err(TransportError::Rejected { status, message });
                }
                RetryOutcome::RetryableError(cause) => {
                    tracing::warn!(
                        host = %host.label(),
                        attempt = ctx.attempts(),
                        timeout = ?timeout,
                        remaining_hosts = ctx.remaining_hosts(),
                        cause = %cause,
                        "Attempt failed, trying next host"
                    );
                    self.registry.report_failure(&host);
                    last_cause = cause;
                }
            }
        }

        if ctx.deadline_exceeded() {
            tracing::warn!(elapsed = ?ctx.elapsed(), "Overall deadline reached");
        }
        tracing::error!(
            call_type = %call_type,
            attempts = ctx.attempts(),
            cause = %last_cause,
            "All hosts failed"
        );
        Err(TransportError::Unreachable {
            attempts: ctx.attempts(),
            last_cause,
        })
    }
}
