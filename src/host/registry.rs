//! Host registry.
//!
//! # Responsibilities
//! - Hold the ranked host list built from configuration
//! - Hand out the eligible hosts for a call category
//! - Record attempt outcomes as host health

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::time::Instant;

use crate::config::{HostAccept, HostConfig};
use crate::host::stateful::{parse_host_url, StatefulHost};
use crate::host::CallType;
use crate::observability::metrics;

/// Diagnostic view of one host.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HostSnapshot {
    pub url: String,
    pub accept: HostAccept,
    pub is_up: bool,
    pub secs_since_check: u64,
}

/// Owns host health for the lifetime of a client.
#[derive(Debug)]
pub struct HostRegistry {
    /// Hosts in priority order.
    hosts: Vec<Arc<StatefulHost>>,
    /// How long a failed host stays excluded.
    down_expiry: Duration,
}

impl HostRegistry {
    /// Build the registry from configuration.
    ///
    /// Fixed hosts keep their configured order; `shuffle` hosts follow in an
    /// order randomized once for this registry.
    pub fn new(configs: &[HostConfig], down_expiry: Duration) -> Self {
        let mut fixed = Vec::new();
        let mut shuffled = Vec::new();

        for config in configs {
            match parse_host_url(&config.url) {
                Ok(url) => {
                    let host = Arc::new(StatefulHost::new(url, config.accept));
                    if config.shuffle {
                        shuffled.push(host);
                    } else {
                        fixed.push(host);
                    }
                }
                Err(e) => {
                    tracing::warn!(url = %config.url, error = %e, "Ignoring invalid host");
                }
            }
        }

        shuffled.shuffle(&mut rand::thread_rng());
        fixed.extend(shuffled);

        Self {
            hosts: fixed,
            down_expiry,
        }
    }

    /// Eligible hosts for a call category, in priority order.
    pub fn list_hosts(&self, call_type: CallType) -> Vec<Arc<StatefulHost>> {
        self.list_hosts_at(call_type, Instant::now())
    }

    /// Eligible hosts for a call category as of `now`.
    ///
    /// Down hosts whose downtime reached the expiry window are reset to up.
    /// When no host is eligible, every host of the category is returned.
    pub fn list_hosts_at(&self, call_type: CallType, now: Instant) -> Vec<Arc<StatefulHost>> {
        let candidates: Vec<_> = self
            .hosts
            .iter()
            .filter(|h| h.accepts(call_type))
            .cloned()
            .collect();

        let mut eligible = Vec::with_capacity(candidates.len());
        for host in &candidates {
            if host.is_up() {
                eligible.push(host.clone());
            } else if host.is_eligible(now, self.down_expiry) {
                tracing::debug!(host = %host.label(), "Host down window expired, retrying it");
                host.mark_up(now);
                metrics::record_host_health(&host.label(), true);
                eligible.push(host.clone());
            }
        }

        if eligible.is_empty() && !candidates.is_empty() {
            tracing::warn!(
                call_type = %call_type,
                host_count = candidates.len(),
                "All hosts are down, falling back to the full host list"
            );
            return candidates;
        }
        eligible
    }

    /// Record a successful attempt.
    pub fn report_success(&self, host: &StatefulHost) {
        if !host.is_up() {
            tracing::info!(host = %host.label(), "Host is back up");
        }
        host.mark_up(Instant::now());
        metrics::record_host_health(&host.label(), true);
    }

    /// Record a failed attempt.
    pub fn report_failure(&self, host: &StatefulHost) {
        if host.is_up() {
            tracing::warn!(host = %host.label(), "Marking host down");
        }
        host.mark_down(Instant::now());
        metrics::record_host_health(&host.label(), false);
    }

    /// All configured hosts in priority order.
    pub fn hosts(&self) -> &[Arc<StatefulHost>] {
        &self.hosts
    }

    pub fn down_expiry(&self) -> Duration {
        self.down_expiry
    }

    /// Health of every host, for diagnostics.
    pub fn snapshot(&self) -> Vec<HostSnapshot> {
        let now = Instant::now();
        self.hosts
            .iter()
            .map(|h| {
                let health = h.health();
                HostSnapshot {
                    url: h.url.to_string(),
                    accept: h.accept,
                    is_up: health.is_up,
                    secs_since_check: now.saturating_duration_since(health.last_health_check).as_secs(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPIRY: Duration = Duration::from_secs(300);

    fn registry(hosts: &[(&str, HostAccept)]) -> HostRegistry {
        let configs: Vec<_> = hosts.iter().map(|(u, a)| HostConfig::new(*u, *a)).collect();
        HostRegistry::new(&configs, EXPIRY)
    }

    fn urls(hosts: &[Arc<StatefulHost>]) -> Vec<String> {
        hosts.iter().map(|h| h.label()).collect()
    }

    #[test]
    fn test_filters_by_call_type() {
        let reg = registry(&[
            ("read.example.com", HostAccept::Read),
            ("write.example.com", HostAccept::Write),
            ("both.example.com", HostAccept::ReadWrite),
        ]);
        assert_eq!(urls(&reg.list_hosts(CallType::Read)), ["read.example.com", "both.example.com"]);
        assert_eq!(urls(&reg.list_hosts(CallType::Write)), ["write.example.com", "both.example.com"]);
    }

    #[test]
    fn test_fixed_hosts_precede_shuffled() {
        let configs = vec![
            HostConfig::new("c1.example.com", HostAccept::ReadWrite).shuffled(),
            HostConfig::new("primary.example.com", HostAccept::ReadWrite),
            HostConfig::new("c2.example.com", HostAccept::ReadWrite).shuffled(),
            HostConfig::new("c3.example.com", HostAccept::ReadWrite).shuffled(),
        ];
        let reg = HostRegistry::new(&configs, EXPIRY);
        let order = urls(&reg.list_hosts(CallType::Read));
        assert_eq!(order[0], "primary.example.com");

        let mut tail = order[1..].to_vec();
        tail.sort();
        assert_eq!(tail, ["c1.example.com", "c2.example.com", "c3.example.com"]);

        // Stable for the lifetime of the registry.
        assert_eq!(urls(&reg.list_hosts(CallType::Read)), order);
    }

    #[test]
    fn test_down_host_excluded_then_expires() {
        let reg = registry(&[
            ("a.example.com", HostAccept::ReadWrite),
            ("b.example.com", HostAccept::ReadWrite),
        ]);
        let a = reg.hosts()[0].clone();
        reg.report_failure(&a);
        let down_at = a.health().last_health_check;

        assert_eq!(urls(&reg.list_hosts_at(CallType::Read, down_at)), ["b.example.com"]);
        assert_eq!(
            urls(&reg.list_hosts_at(CallType::Read, down_at + EXPIRY - Duration::from_millis(1))),
            ["b.example.com"]
        );

        let later = down_at + EXPIRY;
        assert_eq!(urls(&reg.list_hosts_at(CallType::Read, later)), ["a.example.com", "b.example.com"]);
        assert!(a.is_up());
    }

    #[test]
    fn test_all_down_falls_back_to_full_list() {
        let reg = registry(&[
            ("a.example.com", HostAccept::ReadWrite),
            ("b.example.com", HostAccept::Read),
            ("w.example.com", HostAccept::Write),
        ]);
        for h in reg.hosts() {
            reg.report_failure(h);
        }
        assert_eq!(urls(&reg.list_hosts(CallType::Read)), ["a.example.com", "b.example.com"]);
        assert!(reg.hosts().iter().all(|h| !h.is_up()));
    }

    #[test]
    fn test_report_success_restores() {
        let reg = registry(&[("a.example.com", HostAccept::ReadWrite)]);
        let a = reg.hosts()[0].clone();
        reg.report_failure(&a);
        reg.report_failure(&a);
        assert!(!a.is_up());
        reg.report_success(&a);
        assert!(a.is_up());

        let snapshot = reg.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].is_up);
        assert_eq!(snapshot[0].url, "https://a.example.com/");
    }

    #[test]
    fn test_invalid_host_skipped() {
        let reg = registry(&[("http://[::1", HostAccept::ReadWrite), ("ok.example.com", HostAccept::ReadWrite)]);
        assert_eq!(reg.hosts().len(), 1);
    }
}
