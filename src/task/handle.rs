//! Task handles and write responses bound to them.

use std::ops::Deref;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::task::poller::WaitOutcome;
use crate::transport::executor::HttpTransport;
use crate::transport::request::{encode_segment, RequestOptions};

/// Status value that marks a task as durable.
pub const PUBLISHED: &str = "published";

/// Write responses that carry a server-side task id.
pub trait TaskResponse {
    fn task_id(&self) -> i64;
}

/// A server-side task and the index it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaskHandle {
    task_id: i64,
    index: String,
}

impl TaskHandle {
    pub fn new(task_id: i64, index: impl Into<String>) -> Self {
        Self {
            task_id,
            index: index.into(),
        }
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Path of the task status endpoint.
    pub fn status_path(&self) -> String {
        format!("/1/indexes/{}/task/{}", encode_segment(&self.index), self.task_id)
    }
}

/// Body of the task status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskStatus {
    pub status: String,
    #[serde(rename = "pendingTask", default)]
    pub pending_task: bool,
}

impl TaskStatus {
    pub fn is_published(&self) -> bool {
        self.status == PUBLISHED
    }
}

/// Waits for one task through the transport that created it.
#[derive(Debug, Clone)]
pub struct TaskWaiter {
    transport: HttpTransport,
    handle: TaskHandle,
}

impl TaskWaiter {
    pub fn new(transport: HttpTransport, handle: TaskHandle) -> Self {
        Self { transport, handle }
    }

    pub fn handle(&self) -> &TaskHandle {
        &self.handle
    }

    /// Wait with the configured initial delay.
    pub async fn wait(&self) -> WaitOutcome {
        let initial = self.transport.config().polling.initial_delay();
        self.wait_with(initial, &RequestOptions::default()).await
    }

    /// Wait with an explicit initial delay and options for the status queries.
    pub async fn wait_with(&self, initial_delay: Duration, options: &RequestOptions) -> WaitOutcome {
        self.transport.wait_task(&self.handle, initial_delay, options).await
    }
}

/// A decoded write response plus the means to wait for its task.
///
/// Dropping it without waiting is fine; the write already happened.
#[derive(Debug, Clone)]
pub struct Waitable<R> {
    response: R,
    waiter: TaskWaiter,
}

impl<R> Waitable<R> {
    pub fn new(response: R, waiter: TaskWaiter) -> Self {
        Self { response, waiter }
    }

    pub fn response(&self) -> &R {
        &self.response
    }

    pub fn handle(&self) -> &TaskHandle {
        self.waiter.handle()
    }

    pub fn into_response(self) -> R {
        self.response
    }

    pub fn into_parts(self) -> (R, TaskWaiter) {
        (self.response, self.waiter)
    }

    pub async fn wait(&self) -> WaitOutcome {
        self.waiter.wait().await
    }
}

impl<R> Deref for Waitable<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.response
    }
}
