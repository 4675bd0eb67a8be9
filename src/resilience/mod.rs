//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Logical call (call_type, optional timeout override):
//!     → retries.rs asks the host registry for eligible hosts
//!     → context.rs hands out (host, timeout) pairs in order
//!     → backoff.rs grows the timeout: base * 2^attempt, capped
//!     → outcome.rs classifies what the host did
//!     → success / rejection returned, retryable failure fails over
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Only infrastructure failures justify failover
//! - A call also stops once its overall deadline has passed

pub mod backoff;
pub mod context;
pub mod outcome;
pub mod retries;

pub use context::AttemptContext;
pub use outcome::{classify_status, RetryOutcome, StatusClass};
pub use retries::RetryStrategy;
