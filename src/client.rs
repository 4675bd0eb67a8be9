//! Search client entry point.

use reqwest::Method;

use crate::config::ClientConfig;
use crate::host::{CallType, HostSnapshot};
use crate::index::{ListIndicesResponse, SearchIndex};
use crate::transport::{HttpTransport, RequestOptions, TransportResult};

/// Entry point owning the transport (and through it the host registry).
///
/// Cheap to clone; clones and the indexes they create share host health.
#[derive(Debug, Clone)]
pub struct SearchClient {
    transport: HttpTransport,
}

impl SearchClient {
    pub fn new(config: ClientConfig) -> TransportResult<Self> {
        Ok(Self::from_transport(HttpTransport::new(config)?))
    }

    pub fn from_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn init_index(&self, name: impl Into<String>) -> SearchIndex {
        SearchIndex::new(self.transport.clone(), name)
    }

    pub async fn list_indices(&self, options: &RequestOptions) -> TransportResult<ListIndicesResponse> {
        self.transport
            .execute::<(), _>(Method::GET, "/1/indexes", CallType::Read, None, options)
            .await
    }

    /// Current health of every configured host.
    pub fn hosts(&self) -> Vec<HostSnapshot> {
        self.transport.registry().snapshot()
    }
}
