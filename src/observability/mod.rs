//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / retry strategy / executor / poller produce:
//!     → tracing events (structured fields, per-call span with operation id)
//!     → metrics.rs (counters, gauges, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → logging.rs subscriber (CLI, or the embedding application's own)
//!     → any `metrics` recorder installed by the application
//! ```

pub mod logging;
pub mod metrics;
