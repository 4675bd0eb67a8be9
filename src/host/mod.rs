//! Host subsystem.
//!
//! # Data Flow
//! ```text
//! ClientConfig.hosts
//!     → registry.rs (fixed hosts first, shuffled cluster members after)
//!     → list_hosts(call_type): filter by category, drop down hosts
//!         unless their down window expired
//!     → retry strategy tries them in order
//!     → report_success / report_failure update stateful.rs
//! ```
//!
//! # Design Decisions
//! - Health is advisory and self-healing (down state expires)
//! - An all-down category falls back to every host of that category
//! - Health lives in an `ArcSwap` per host; no lock is held across I/O
//! - 4xx answers never mark a host down

pub mod call_type;
pub mod registry;
pub mod stateful;

pub use call_type::CallType;
pub use registry::{HostRegistry, HostSnapshot};
pub use stateful::{parse_host_url, HostHealth, StatefulHost};
