//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::host::CallType;

/// Root configuration for a search client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Application identifier sent with every request.
    pub application_id: String,

    /// API key sent with every request.
    pub api_key: String,

    /// Host definitions. When empty, the default layout derived from the
    /// application id is used.
    pub hosts: Vec<HostConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// How long a host stays excluded after a failure, in seconds.
    pub host_down_expiry_secs: u64,

    /// Task polling settings.
    pub polling: PollingConfig,

    /// Number of records per batch request when saving many objects.
    pub batch_size: usize,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            api_key: String::new(),
            hosts: Vec::new(),
            timeouts: TimeoutConfig::default(),
            host_down_expiry_secs: 300,
            polling: PollingConfig::default(),
            batch_size: 1000,
            user_agent: format!("search-transport/{}", env!("CARGO_PKG_VERSION")),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for an application with the default host layout.
    pub fn new(application_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let application_id = application_id.into();
        Self {
            hosts: default_hosts(&application_id),
            application_id,
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Replace the host list.
    pub fn with_hosts(mut self, hosts: Vec<HostConfig>) -> Self {
        self.hosts = hosts;
        self
    }

    /// Hosts to use: the configured list, or the default layout when empty.
    pub fn effective_hosts(&self) -> Vec<HostConfig> {
        if self.hosts.is_empty() {
            default_hosts(&self.application_id)
        } else {
            self.hosts.clone()
        }
    }

    pub fn host_down_expiry(&self) -> Duration {
        Duration::from_secs(self.host_down_expiry_secs)
    }
}

/// Default host layout: a read-only DSN host, a write host, then three
/// shared cluster members in per-client random order.
pub fn default_hosts(application_id: &str) -> Vec<HostConfig> {
    let app = application_id.to_lowercase();
    let mut hosts = vec![
        HostConfig::new(format!("{app}-dsn.algolia.net"), HostAccept::Read),
        HostConfig::new(format!("{app}.algolia.net"), HostAccept::Write),
    ];
    for i in 1..=3 {
        hosts.push(HostConfig::new(format!("{app}-{i}.algolianet.com"), HostAccept::ReadWrite).shuffled());
    }
    hosts
}

/// A single API host.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HostConfig {
    /// Domain name (`https://` is assumed) or full base URL.
    pub url: String,

    /// Call categories this host serves.
    #[serde(default)]
    pub accept: HostAccept,

    /// Place this host in the randomized tail of the priority order.
    #[serde(default)]
    pub shuffle: bool,
}

impl HostConfig {
    pub fn new(url: impl Into<String>, accept: HostAccept) -> Self {
        Self {
            url: url.into(),
            accept,
            shuffle: false,
        }
    }

    pub fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }
}

/// Which call categories a host accepts.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HostAccept {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl HostAccept {
    pub fn accepts(self, call_type: CallType) -> bool {
        match self {
            HostAccept::ReadWrite => true,
            HostAccept::Read => call_type == CallType::Read,
            HostAccept::Write => call_type == CallType::Write,
        }
    }
}

/// Timeout configuration for requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in milliseconds.
    pub connect_ms: u64,

    /// Base per-attempt timeout for read calls in milliseconds.
    pub read_ms: u64,

    /// Base per-attempt timeout for write calls in milliseconds.
    pub write_ms: u64,

    /// Upper bound for an escalated per-attempt timeout in milliseconds.
    pub max_ms: u64,

    /// Overall deadline for one logical call across all hosts in milliseconds.
    pub total_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 2_000,
            read_ms: 5_000,
            write_ms: 30_000,
            max_ms: 60_000,
            total_ms: 300_000,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    /// Base per-attempt timeout for a call category.
    pub fn base_for(&self, call_type: CallType) -> Duration {
        match call_type {
            CallType::Read => Duration::from_millis(self.read_ms),
            CallType::Write => Duration::from_millis(self.write_ms),
        }
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_ms)
    }
}

/// Task polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay after the first unsuccessful status check in milliseconds.
    pub initial_delay_ms: u64,

    /// Cap for the doubling delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 100,
            max_delay_ms: 5_000,
        }
    }
}

impl PollingConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}
