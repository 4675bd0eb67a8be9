//! Exponential growth helpers for attempt timeouts and poll delays.

use std::time::Duration;

/// Timeout for the attempt at `attempt_index` (0-based): `base * 2^index`,
/// capped at `max`.
pub fn attempt_timeout(base: Duration, attempt_index: u32, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(attempt_index);
    base.saturating_mul(factor).min(max)
}

/// Next poll delay: double the current one, capped at `max`.
pub fn next_poll_delay(current: Duration, max: Duration) -> Duration {
    current.saturating_mul(2).min(max)
}
