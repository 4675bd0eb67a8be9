//! Write calls and waiting for their tasks.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use search_transport::task::PollState;
use search_transport::{RequestOptions, SearchClient};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

mod common;

/// Backend answering writes with task 7 and reporting it published on the
/// `publish_on`-th status check.
async fn task_backend(publish_on: u32) -> (std::net::SocketAddr, common::RequestLog) {
    let checks = Arc::new(AtomicU32::new(0));
    common::start_programmable_backend(move |req: common::RecordedRequest| {
        let checks = checks.clone();
        async move {
            if req.path().contains("/task/") {
                let n = checks.fetch_add(1, Ordering::SeqCst) + 1;
                let status = if n >= publish_on { "published" } else { "notPublished" };
                (200, json!({"status": status, "pendingTask": n < publish_on}).to_string())
            } else if req.path().ends_with("/batch") {
                let body: Value = serde_json::from_str(&req.body).unwrap_or_default();
                let ids: Vec<String> = body["requests"]
                    .as_array()
                    .map(|ops| {
                        ops.iter()
                            .enumerate()
                            .map(|(i, op)| match op["body"]["objectID"].as_str() {
                                Some(id) => id.to_string(),
                                None => format!("generated-{i}"),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                (200, json!({"taskID": 7, "objectIDs": ids}).to_string())
            } else {
                (200, json!({"taskID": 7, "updatedAt": "2024-01-01T00:00:00Z"}).to_string())
            }
        }
    })
    .await
}

/// Actions of every batch request received, in order.
fn batch_actions(log: &common::RequestLog) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|r| r.path() == "/1/indexes/products/batch")
        .flat_map(|r| {
            let body: Value = serde_json::from_str(&r.body).unwrap();
            body["requests"]
                .as_array()
                .unwrap()
                .iter()
                .map(|op| op["action"].as_str().unwrap().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn status_checks(log: &common::RequestLog) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|r| r.method == "GET" && r.path() == "/1/indexes/products/task/7")
        .count()
}

#[tokio::test]
async fn test_save_object_then_wait_until_published() {
    let (addr, log) = task_backend(3).await;
    let client = SearchClient::new(common::local_config(&[addr])).unwrap();
    let index = client.init_index("products");

    let response = index
        .save_object(&json!({"objectID": "phone-1", "name": "phone"}), false, &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(response.responses.len(), 1);
    assert_eq!(response.responses[0].task_id, 7);
    assert_eq!(response.object_ids(), ["phone-1"]);
    assert_eq!(batch_actions(&log), ["updateObject"]);

    let started = Instant::now();
    let outcome = response.wait().await;

    assert!(outcome.is_done());
    assert_eq!(outcome.checks, 3);
    assert_eq!(status_checks(&log), 3);
    // Delays of 100ms then 200ms between the three checks.
    assert!(started.elapsed() >= Duration::from_millis(300));

    let first = log.lock().unwrap()[0].clone();
    assert_eq!(first.method, "POST");
    assert_eq!(first.path(), "/1/indexes/products/batch");
}

#[tokio::test]
async fn test_save_object_with_generated_id() {
    let (addr, log) = task_backend(1).await;
    let client = SearchClient::new(common::local_config(&[addr])).unwrap();

    let response = client
        .init_index("products")
        .save_object(&json!({"name": "phone"}), true, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.object_ids(), ["generated-0"]);
    assert_eq!(batch_actions(&log), ["addObject"]);
}

#[tokio::test]
async fn test_partial_updates() {
    let (addr, log) = task_backend(1).await;
    let client = SearchClient::new(common::local_config(&[addr])).unwrap();
    let index = client.init_index("products");

    let response = index
        .partial_update_object("phone 1", &json!({"price": 10}), false, &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(response.task_id, 7);
    {
        let requests = log.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.path(), "/1/indexes/products/phone%201/partial");
        assert!(request.target.contains("createIfNotExists=false"));
        assert_eq!(serde_json::from_str::<Value>(&request.body).unwrap(), json!({"price": 10}));
    }

    let records = vec![json!({"objectID": "a", "price": 1}), json!({"objectID": "b", "price": 2})];
    index
        .partial_update_objects(&records, true, &RequestOptions::new())
        .await
        .unwrap();
    index
        .partial_update_objects(&records, false, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(
        batch_actions(&log),
        [
            "partialUpdateObject",
            "partialUpdateObject",
            "partialUpdateObjectNoCreate",
            "partialUpdateObjectNoCreate",
        ]
    );
}

#[tokio::test]
async fn test_wait_task_by_id() {
    let (addr, log) = task_backend(1).await;
    let client = SearchClient::new(common::local_config(&[addr])).unwrap();

    let outcome = client
        .init_index("products")
        .wait_task(7, &RequestOptions::new())
        .await;

    assert!(outcome.is_done());
    assert_eq!(outcome.checks, 1);
    assert_eq!(status_checks(&log), 1);
}

#[tokio::test]
async fn test_save_objects_is_chunked() {
    let (addr, log) = task_backend(1).await;
    let mut config = common::local_config(&[addr]);
    config.batch_size = 2;
    let client = SearchClient::new(config).unwrap();

    let records: Vec<Value> = (0..5).map(|i| json!({"objectID": format!("r{i}")})).collect();
    let response = client
        .init_index("products")
        .save_objects(&records, false, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.responses.len(), 3);
    let mut ids = response.object_ids();
    ids.sort();
    assert_eq!(ids, ["r0", "r1", "r2", "r3", "r4"]);

    let batches = log
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.path() == "/1/indexes/products/batch")
        .count();
    assert_eq!(batches, 3);
    assert!(batch_actions(&log).iter().all(|a| a == "updateObject"));

    let outcome = response.wait().await;
    assert!(outcome.is_done());
}

#[tokio::test]
async fn test_wait_aborts_when_status_unavailable() {
    let (addr, _) = common::start_programmable_backend(|req: common::RecordedRequest| async move {
        if req.path().contains("/task/") {
            (503, "Service Unavailable".to_string())
        } else {
            (200, json!({"taskID": 9, "deletedAt": "2024-01-01T00:00:00Z"}).to_string())
        }
    })
    .await;
    let client = SearchClient::new(common::local_config(&[addr])).unwrap();

    let response = client
        .init_index("products")
        .delete_object("r1", &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(response.task_id, 9);

    let outcome = response.wait().await;
    assert_eq!(outcome.state, PollState::Aborted);
    assert_eq!(outcome.checks, 0);
}

#[tokio::test]
async fn test_wait_cancelled_by_caller() {
    let (addr, log) = task_backend(u32::MAX).await;
    let client = SearchClient::new(common::local_config(&[addr])).unwrap();
    let response = client
        .init_index("products")
        .clear_objects(&RequestOptions::new())
        .await
        .unwrap();

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        canceller.cancel();
    });

    let options = RequestOptions::new().with_cancellation(token);
    let started = Instant::now();
    let (_, waiter) = response.into_parts();
    let outcome = waiter.wait_with(Duration::from_millis(100), &options).await;

    assert_eq!(outcome.state, PollState::Aborted);
    assert!(outcome.checks >= 1);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(status_checks(&log), outcome.checks as usize);
}
