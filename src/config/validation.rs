//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Every problem is
//! collected so a broken file can be fixed in one pass.

use std::fmt;

use crate::config::schema::ClientConfig;
use crate::host::{parse_host_url, CallType};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.application_id.trim().is_empty() {
        errors.push(ValidationError::new("application_id", "must not be empty"));
    }
    if config.api_key.trim().is_empty() {
        errors.push(ValidationError::new("api_key", "must not be empty"));
    }

    let hosts = config.effective_hosts();
    for (i, host) in hosts.iter().enumerate() {
        if let Err(e) = parse_host_url(&host.url) {
            errors.push(ValidationError::new(
                format!("hosts[{i}].url"),
                format!("invalid host '{}': {}", host.url, e),
            ));
        }
    }
    for call_type in [CallType::Read, CallType::Write] {
        if !hosts.iter().any(|h| h.accept.accepts(call_type)) {
            errors.push(ValidationError::new(
                "hosts",
                format!("no host accepts {call_type} calls"),
            ));
        }
    }

    let t = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_ms", t.connect_ms),
        ("timeouts.read_ms", t.read_ms),
        ("timeouts.write_ms", t.write_ms),
        ("timeouts.total_ms", t.total_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }
    if t.max_ms < t.read_ms.max(t.write_ms) {
        errors.push(ValidationError::new(
            "timeouts.max_ms",
            "must not be smaller than read_ms or write_ms",
        ));
    }

    if config.polling.initial_delay_ms == 0 {
        errors.push(ValidationError::new("polling.initial_delay_ms", "must be greater than zero"));
    }
    if config.polling.max_delay_ms < config.polling.initial_delay_ms {
        errors.push(ValidationError::new(
            "polling.max_delay_ms",
            "must not be smaller than initial_delay_ms",
        ));
    }

    if config.batch_size == 0 {
        errors.push(ValidationError::new("batch_size", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
