//! Metrics collection.
//!
//! # Metrics
//! - `search_transport_attempts_total` (counter): attempts by host, outcome
//! - `search_transport_attempt_duration_seconds` (histogram): per-attempt latency
//! - `search_transport_host_up` (gauge): 1=up, 0=down
//! - `search_transport_task_checks_total` (counter): task status queries by result
//!
//! Only the `metrics` facade is used; installing a recorder/exporter is left
//! to the application embedding the client.

use std::time::Instant;

/// Record a finished attempt against a host.
pub fn record_attempt(host: &str, outcome: &'static str, started: Instant) {
    metrics::counter!(
        "search_transport_attempts_total",
        "host" => host.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "search_transport_attempt_duration_seconds",
        "host" => host.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record a host health transition.
pub fn record_host_health(host: &str, is_up: bool) {
    metrics::gauge!("search_transport_host_up", "host" => host.to_string())
        .set(if is_up { 1.0 } else { 0.0 });
}

/// Record one task status query.
pub fn record_task_check(published: bool) {
    let result = if published { "published" } else { "pending" };
    metrics::counter!("search_transport_task_checks_total", "result" => result).increment(1);
}
