//! Host abstraction.
//!
//! # Responsibilities
//! - Represent a single API host
//! - Track health state (up/down) and when it last changed
//! - Answer whether a down host has waited long enough to be retried

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::time::Instant;
use url::Url;

use crate::config::HostAccept;
use crate::host::CallType;

/// Parse a configured host into a base URL.
///
/// Bare domain names get `https://`; anything with a scheme is taken as is.
pub fn parse_host_url(raw: &str) -> Result<Url, url::ParseError> {
    if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{raw}"))
    }
}

/// Health as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostHealth {
    pub is_up: bool,
    pub last_health_check: Instant,
}

/// A single API host with advisory health state.
#[derive(Debug)]
pub struct StatefulHost {
    /// Base URL requests are resolved against.
    pub url: Url,
    /// Call categories this host serves.
    pub accept: HostAccept,
    health: ArcSwap<HostHealth>,
}

impl StatefulHost {
    /// Create a new host, initially up.
    pub fn new(url: Url, accept: HostAccept) -> Self {
        Self {
            url,
            accept,
            health: ArcSwap::from_pointee(HostHealth {
                is_up: true,
                last_health_check: Instant::now(),
            }),
        }
    }

    /// Host and port, for logs and metric labels.
    pub fn label(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => self.url.to_string(),
        }
    }

    pub fn accepts(&self, call_type: CallType) -> bool {
        self.accept.accepts(call_type)
    }

    pub fn health(&self) -> HostHealth {
        **self.health.load()
    }

    pub fn is_up(&self) -> bool {
        self.health.load().is_up
    }

    /// Mark the host up at `now`.
    pub fn mark_up(&self, now: Instant) {
        self.health.store(Arc::new(HostHealth {
            is_up: true,
            last_health_check: now,
        }));
    }

    /// Mark the host down at `now`.
    pub fn mark_down(&self, now: Instant) {
        self.health.store(Arc::new(HostHealth {
            is_up: false,
            last_health_check: now,
        }));
    }

    /// True if the host is up, or has been down for at least `expiry`.
    pub fn is_eligible(&self, now: Instant, expiry: Duration) -> bool {
        let health = self.health();
        health.is_up || now.saturating_duration_since(health.last_health_check) >= expiry
    }
}
