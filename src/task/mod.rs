//! Task completion subsystem.
//!
//! # Data Flow
//! ```text
//! write call succeeds
//!     → executor decodes R: TaskResponse
//!     → handle.rs: Waitable<R> { response, TaskWaiter(TaskHandle) }
//!     → caller optionally calls wait()
//!     → poller.rs: GET /1/indexes/{index}/task/{id} until "published"
//! ```
//!
//! # Design Decisions
//! - Waiting is optional; the write has already been accepted
//! - Cancellation and query failures end the wait quietly

pub mod handle;
pub mod poller;

pub use handle::{TaskHandle, TaskResponse, TaskStatus, TaskWaiter, Waitable, PUBLISHED};
pub use poller::{PollMachine, PollState, TaskPoller, WaitOutcome};
