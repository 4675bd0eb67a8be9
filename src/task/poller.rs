//! Task completion polling.
//!
//! # States
//! - Polling: status queries continue
//! - Done: a query reported the task published
//! - Aborted: the caller cancelled or a status query failed
//!
//! # State Transitions
//! ```text
//! Polling → Polling: not published; sleep delay, delay = min(delay * 2, max)
//! Polling → Done:    status == "published"
//! Polling → Aborted: cancellation (during a query or a sleep), query error
//! ```
//!
//! # Design Decisions
//! - No attempt limit; only publication or the caller ends the wait
//! - Aborting is not an error: the write itself already succeeded

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::observability::metrics;
use crate::resilience::backoff::next_poll_delay;
use crate::task::handle::TaskStatus;
use crate::transport::error::TransportResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Done,
    Aborted,
}

/// Terminal result of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    pub state: PollState,
    /// Status queries answered during the wait.
    pub checks: u32,
}

impl WaitOutcome {
    pub fn is_done(&self) -> bool {
        self.state == PollState::Done
    }
}

/// The polling state machine, independent of any timer or transport.
#[derive(Debug)]
pub struct PollMachine {
    state: PollState,
    delay: Duration,
    max_delay: Duration,
    checks: u32,
}

impl PollMachine {
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            state: PollState::Polling,
            delay: initial_delay.min(max_delay),
            max_delay,
            checks: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Feed one status answer.
    ///
    /// Returns how long to sleep before the next query, or `None` once the
    /// machine is terminal.
    pub fn on_status(&mut self, published: bool) -> Option<Duration> {
        if self.state != PollState::Polling {
            return None;
        }
        self.checks += 1;
        if published {
            self.state = PollState::Done;
            return None;
        }
        let sleep = self.delay;
        self.delay = next_poll_delay(self.delay, self.max_delay);
        Some(sleep)
    }

    pub fn abort(&mut self) {
        if self.state == PollState::Polling {
            self.state = PollState::Aborted;
        }
    }

    pub fn outcome(&self) -> WaitOutcome {
        WaitOutcome {
            state: self.state,
            checks: self.checks,
        }
    }
}

/// Drives a [`PollMachine`] with a status source and a cancellable timer.
#[derive(Debug, Clone, Copy)]
pub struct TaskPoller {
    initial_delay: Duration,
    max_delay: Duration,
}

impl TaskPoller {
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
        }
    }

    /// Query `fetch` until the task is published, `cancel` fires, or a query
    /// fails.
    pub async fn wait_for_completion<F, Fut>(&self, mut fetch: F, cancel: &CancellationToken) -> WaitOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TransportResult<TaskStatus>>,
    {
        let mut machine = PollMachine::new(self.initial_delay, self.max_delay);

        while machine.state() == PollState::Polling {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(checks = machine.outcome().checks, "Task wait cancelled");
                    machine.abort();
                    break;
                }
                result = fetch() => result,
            };

            let status = match result {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(error = %e, "Task status query failed, abandoning wait");
                    machine.abort();
                    break;
                }
            };
            metrics::record_task_check(status.is_published());

            let Some(delay) = machine.on_status(status.is_published()) else {
                break;
            };
            tracing::trace!(status = %status.status, delay = ?delay, "Task not published yet");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(checks = machine.outcome().checks, "Task wait cancelled");
                    machine.abort();
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        machine.outcome()
    }
}
