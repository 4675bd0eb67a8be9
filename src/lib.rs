//! Fault-tolerant transport for a multi-region search API.
//!
//! # Architecture Overview
//!
//! ```text
//!  SearchClient / SearchIndex (endpoint wrappers: verb, path, body, type)
//!        │
//!        ▼
//!  transport::HttpTransport ──► resilience::RetryStrategy ──► host::HostRegistry
//!        │   one attempt per host,        ranked hosts,          up/down state,
//!        │   escalating timeout           failover               self-expiring
//!        ▼
//!  task::Waitable<R> ──► task::TaskPoller (poll until "published")
//! ```
//!
//! Cross-cutting: `config` (immutable client configuration) and
//! `observability` (tracing + metrics facade).

// Core subsystems
pub mod host;
pub mod resilience;
pub mod task;
pub mod transport;

// Endpoint wrappers
pub mod client;
pub mod index;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use client::SearchClient;
pub use config::ClientConfig;
pub use host::CallType;
pub use index::SearchIndex;
pub use task::{WaitOutcome, Waitable};
pub use transport::{HttpTransport, RequestOptions, TransportError};
