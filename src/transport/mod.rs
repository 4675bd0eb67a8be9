//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint wrapper: (method, path, call_type, body, R, RequestOptions)
//!     → executor.rs: serialize body, build headers
//!     → resilience::RetryStrategy: host order, timeouts, failover
//!         → executor.rs send_once: one HTTP attempt → RetryOutcome
//!     → decode R, or TransportError
//!     → writes: Waitable<R> bound to the returned task
//! ```
//!
//! # Design Decisions
//! - "Request rejected" and "service unreachable" are distinct error kinds
//! - Unclassified reqwest errors are treated as retryable
//! - Cancellation drops the in-flight attempt, closing its connection

pub mod error;
pub mod executor;
pub mod request;

pub use error::{FailureCause, TransportError, TransportResult};
pub use executor::HttpTransport;
pub use request::RequestOptions;
