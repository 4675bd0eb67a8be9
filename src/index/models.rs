//! Request and response bodies of the index endpoints.

use serde::{Deserialize, Serialize};

use crate::task::{PollState, TaskResponse, WaitOutcome, Waitable};

/// Search parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits_per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_hits_per_page(mut self, hits_per_page: u32) -> Self {
        self.hits_per_page = Some(hits_per_page);
        self
    }

    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }
}

/// Search response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    pub hits: Vec<T>,
    #[serde(default)]
    pub nb_hits: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub nb_pages: u32,
    #[serde(default)]
    pub hits_per_page: u32,
    #[serde(rename = "processingTimeMS", default)]
    pub processing_time_ms: u64,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BatchResponse {
    #[serde(rename = "taskID")]
    pub task_id: i64,
    #[serde(rename = "objectIDs", default)]
    pub object_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeleteResponse {
    #[serde(rename = "taskID")]
    pub task_id: i64,
    #[serde(rename = "deletedAt", default)]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UpdateResponse {
    #[serde(rename = "taskID")]
    pub task_id: i64,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
    #[serde(rename = "objectID", default)]
    pub object_id: Option<String>,
}

impl TaskResponse for BatchResponse {
    fn task_id(&self) -> i64 {
        self.task_id
    }
}

impl TaskResponse for DeleteResponse {
    fn task_id(&self) -> i64 {
        self.task_id
    }
}

impl TaskResponse for UpdateResponse {
    fn task_id(&self) -> i64 {
        self.task_id
    }
}

/// What a batch operation does with its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchAction {
    /// Create a record; the API assigns its object id.
    AddObject,
    /// Create or replace the record named by its `objectID`.
    UpdateObject,
    /// Update some attributes, creating the record when missing.
    PartialUpdateObject,
    /// Update some attributes of an existing record only.
    PartialUpdateObjectNoCreate,
    DeleteObject,
}

/// One operation of a batch request.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOperation<T> {
    pub action: BatchAction,
    pub body: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRequest<T> {
    pub requests: Vec<BatchOperation<T>>,
}

impl<T> BatchRequest<T> {
    /// A batch applying the same action to every record.
    pub fn new(action: BatchAction, records: impl IntoIterator<Item = T>) -> Self {
        Self {
            requests: records
                .into_iter()
                .map(|body| BatchOperation { action, body })
                .collect(),
        }
    }
}

/// Responses of a multi-batch write, one per chunk.
#[derive(Debug)]
pub struct BatchIndexingResponse {
    pub responses: Vec<Waitable<BatchResponse>>,
}

impl BatchIndexingResponse {
    pub fn object_ids(&self) -> Vec<String> {
        self.responses
            .iter()
            .flat_map(|r| r.object_ids.iter().cloned())
            .collect()
    }

    /// Wait for every chunk's task; stops at the first abandoned wait.
    pub async fn wait(&self) -> WaitOutcome {
        let mut checks = 0;
        for response in &self.responses {
            let outcome = response.wait().await;
            checks += outcome.checks;
            if !outcome.is_done() {
                return WaitOutcome {
                    state: outcome.state,
                    checks,
                };
            }
        }
        WaitOutcome {
            state: PollState::Done,
            checks,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    pub name: String,
    #[serde(default)]
    pub entries: u64,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIndicesResponse {
    pub items: Vec<IndexInfo>,
    #[serde(default)]
    pub nb_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_skips_unset_fields() {
        let q = SearchQuery::new("elon").with_hits_per_page(5);
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            json!({"query": "elon", "hitsPerPage": 5})
        );
    }

    #[test]
    fn test_batch_request_shape() {
        let req = BatchRequest::new(BatchAction::AddObject, vec![json!({"name": "a"}), json!({"name": "b"})]);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"requests": [
                {"action": "addObject", "body": {"name": "a"}},
                {"action": "addObject", "body": {"name": "b"}}
            ]})
        );
    }

    #[test]
    fn test_batch_action_names() {
        let names: Vec<_> = [
            BatchAction::AddObject,
            BatchAction::UpdateObject,
            BatchAction::PartialUpdateObject,
            BatchAction::PartialUpdateObjectNoCreate,
            BatchAction::DeleteObject,
        ]
        .iter()
        .map(|a| serde_json::to_value(a).unwrap())
        .collect();
        assert_eq!(
            names,
            [
                json!("addObject"),
                json!("updateObject"),
                json!("partialUpdateObject"),
                json!("partialUpdateObjectNoCreate"),
                json!("deleteObject"),
            ]
        );
    }

    #[test]
    fn test_search_result_decoding() {
        let result: SearchResult<serde_json::Value> = serde_json::from_value(json!({
            "hits": [{"objectID": "1"}],
            "nbHits": 1,
            "processingTimeMS": 2,
            "query": "a"
        }))
        .unwrap();
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.nb_hits, 1);
        assert_eq!(result.processing_time_ms, 2);
    }
}
