//! Index endpoints.
//!
//! Thin wrappers: each method only picks a verb, a path, a call category,
//! a payload and a response type; the transport does the rest.

pub mod models;

use futures_util::future::try_join_all;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::host::CallType;
use crate::task::{TaskHandle, TaskStatus, WaitOutcome, Waitable};
use crate::transport::request::encode_segment;
use crate::transport::{HttpTransport, RequestOptions, TransportResult};

pub use models::{
    BatchAction, BatchIndexingResponse, BatchOperation, BatchRequest, BatchResponse,
    DeleteResponse, IndexInfo, ListIndicesResponse, SearchQuery, SearchResult, UpdateResponse,
};

/// Handle on one index.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    transport: HttpTransport,
    name: String,
    path: String,
}

impl SearchIndex {
    pub(crate) fn new(transport: HttpTransport, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = format!("/1/indexes/{}", encode_segment(&name));
        Self {
            transport,
            name,
            path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn search<T: DeserializeOwned>(
        &self,
        query: &SearchQuery,
        options: &RequestOptions,
    ) -> TransportResult<SearchResult<T>> {
        self.transport
            .execute(Method::POST, &format!("{}/query", self.path), CallType::Read, Some(query), options)
            .await
    }

    pub async fn get_object<T: DeserializeOwned>(
        &self,
        object_id: &str,
        options: &RequestOptions,
    ) -> TransportResult<T> {
        let path = format!("{}/{}", self.path, encode_segment(object_id));
        self.transport
            .execute::<(), _>(Method::GET, &path, CallType::Read, None, options)
            .await
    }

    /// Save one record.
    ///
    /// The record's `objectID` names it unless `auto_generate_object_id` is
    /// set, in which case the API assigns one.
    pub async fn save_object<T: Serialize>(
        &self,
        object: &T,
        auto_generate_object_id: bool,
        options: &RequestOptions,
    ) -> TransportResult<BatchIndexingResponse> {
        self.save_objects(std::slice::from_ref(object), auto_generate_object_id, options)
            .await
    }

    /// Save many records, `batch_size` per request.
    pub async fn save_objects<T: Serialize>(
        &self,
        objects: &[T],
        auto_generate_object_id: bool,
        options: &RequestOptions,
    ) -> TransportResult<BatchIndexingResponse> {
        let action = if auto_generate_object_id {
            BatchAction::AddObject
        } else {
            BatchAction::UpdateObject
        };
        self.split_into_batches(objects, action, options).await
    }

    /// Update some attributes of one record.
    ///
    /// With `create_if_not_exists` unset, a missing record is left alone.
    pub async fn partial_update_object<T: Serialize>(
        &self,
        object_id: &str,
        attributes: &T,
        create_if_not_exists: bool,
        options: &RequestOptions,
    ) -> TransportResult<Waitable<UpdateResponse>> {
        let path = format!("{}/{}/partial", self.path, encode_segment(object_id));
        let options = options
            .clone()
            .with_query_param("createIfNotExists", create_if_not_exists);
        self.transport
            .execute_write(Method::POST, &path, &self.name, Some(attributes), &options)
            .await
    }

    /// Update some attributes of many records; each carries its `objectID`.
    pub async fn partial_update_objects<T: Serialize>(
        &self,
        objects: &[T],
        create_if_not_exists: bool,
        options: &RequestOptions,
    ) -> TransportResult<BatchIndexingResponse> {
        let action = if create_if_not_exists {
            BatchAction::PartialUpdateObject
        } else {
            BatchAction::PartialUpdateObjectNoCreate
        };
        self.split_into_batches(objects, action, options).await
    }

    /// Send `objects` as batches of `batch_size` with one action, chunks
    /// concurrently.
    async fn split_into_batches<T: Serialize>(
        &self,
        objects: &[T],
        action: BatchAction,
        options: &RequestOptions,
    ) -> TransportResult<BatchIndexingResponse> {
        let batch_size = self.transport.config().batch_size.max(1);
        tracing::debug!(
            index = %self.name,
            ?action,
            records = objects.len(),
            batches = objects.len().div_ceil(batch_size),
            "Sending batches"
        );
        let requests: Vec<_> = objects
            .chunks(batch_size)
            .map(|chunk| BatchRequest::new(action, chunk.iter()))
            .collect();
        let responses = try_join_all(requests.iter().map(|req| self.batch(req, options))).await?;
        Ok(BatchIndexingResponse { responses })
    }

    pub async fn batch<T: Serialize>(
        &self,
        request: &BatchRequest<T>,
        options: &RequestOptions,
    ) -> TransportResult<Waitable<BatchResponse>> {
        let path = format!("{}/batch", self.path);
        self.transport
            .execute_write(Method::POST, &path, &self.name, Some(request), options)
            .await
    }

    pub async fn delete_object(
        &self,
        object_id: &str,
        options: &RequestOptions,
    ) -> TransportResult<Waitable<DeleteResponse>> {
        let path = format!("{}/{}", self.path, encode_segment(object_id));
        self.transport
            .execute_write::<(), _>(Method::DELETE, &path, &self.name, None, options)
            .await
    }

    /// Remove every record, keeping settings.
    pub async fn clear_objects(&self, options: &RequestOptions) -> TransportResult<Waitable<DeleteResponse>> {
        let path = format!("{}/clear", self.path);
        self.transport
            .execute_write::<(), _>(Method::POST, &path, &self.name, None, options)
            .await
    }

    pub async fn get_settings(&self, options: &RequestOptions) -> TransportResult<Value> {
        let path = format!("{}/settings", self.path);
        self.transport
            .execute::<(), _>(Method::GET, &path, CallType::Read, None, options)
            .await
    }

    pub async fn set_settings(
        &self,
        settings: &Value,
        forward_to_replicas: bool,
        options: &RequestOptions,
    ) -> TransportResult<Waitable<UpdateResponse>> {
        let path = format!("{}/settings", self.path);
        let options = options.clone().with_query_param("forwardToReplicas", forward_to_replicas);
        self.transport
            .execute_write(Method::PUT, &path, &self.name, Some(settings), &options)
            .await
    }

    pub async fn get_task(&self, task_id: i64, options: &RequestOptions) -> TransportResult<TaskStatus> {
        self.transport
            .task_status(&TaskHandle::new(task_id, self.name.clone()), options)
            .await
    }

    /// Wait for a task of this index with the configured initial delay.
    pub async fn wait_task(&self, task_id: i64, options: &RequestOptions) -> WaitOutcome {
        let initial = self.transport.config().polling.initial_delay();
        self.transport
            .wait_task(&TaskHandle::new(task_id, self.name.clone()), initial, options)
            .await
    }
}
