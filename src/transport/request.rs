//! Per-call request options.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Extra inputs for one call: headers, query parameters, a timeout override
/// and an optional cancellation token.
///
/// Built once per call with the consuming `with_*` methods and never mutated
/// afterwards, so it can be shared freely between concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(name.into(), value.to_string());
        self
    }

    /// Base per-attempt timeout for this call, replacing the category default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abandon the call (or a task wait) when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn query(&self) -> Vec<(&str, &str)> {
        self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }
}

/// Percent-encode a single path segment such as an index name.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
