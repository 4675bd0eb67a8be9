//! Per-call attempt bookkeeping.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::host::StatefulHost;
use crate::resilience::backoff::attempt_timeout;

/// State of one logical call: hosts still to try, attempts made, the
/// current attempt timeout and the overall deadline.
///
/// Owned by the call that created it and dropped when the call ends.
#[derive(Debug)]
pub struct AttemptContext {
    hosts: VecDeque<Arc<StatefulHost>>,
    attempts: u32,
    base_timeout: Duration,
    max_timeout: Duration,
    current_timeout: Duration,
    started: Instant,
    deadline: Duration,
}

impl AttemptContext {
    pub fn new(
        hosts: Vec<Arc<StatefulHost>>,
        base_timeout: Duration,
        max_timeout: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            hosts: hosts.into(),
            attempts: 0,
            base_timeout,
            max_timeout,
            current_timeout: Duration::ZERO,
            started: Instant::now(),
            deadline,
        }
    }

    /// Next host with the timeout to apply to it.
    ///
    /// The timeout is the escalated one, clamped to the time left before the
    /// overall deadline. Returns `None` once every host was tried or the
    /// deadline has passed.
    pub fn next_attempt(&mut self) -> Option<(Arc<StatefulHost>, Duration)> {
        let remaining = self.remaining();
        if remaining.is_zero() {
            return None;
        }
        let host = self.hosts.pop_front()?;
        let escalated = attempt_timeout(self.base_timeout, self.attempts, self.max_timeout)
            .max(self.current_timeout);
        self.current_timeout = escalated;
        self.attempts += 1;
        Some((host, escalated.min(remaining)))
    }

    /// Time left before the overall deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_sub(self.elapsed())
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Timeout of the latest attempt (zero before the first one).
    pub fn current_timeout(&self) -> Duration {
        self.current_timeout
    }

    pub fn remaining_hosts(&self) -> usize {
        self.hosts.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.elapsed() >= self.deadline
    }
}
