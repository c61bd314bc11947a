//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against an in-memory
//! SQLite store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use kvcache::{
    api::create_router,
    store::{DurableStore, SqliteStore},
    AppState, SharedCache,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_state(capacity: usize) -> AppState {
    let store = SqliteStore::open_in_memory().unwrap();
    AppState::new(SharedCache::new(capacity), Arc::new(store))
}

fn create_test_app() -> Router {
    create_router(create_test_state(10))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn get_uri(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn put(app: &Router, key: i64, value: &str) -> StatusCode {
    let body = serde_json::json!({ "key": key, "value": value }).to_string();
    app.clone()
        .oneshot(post_json("/put", &body))
        .await
        .unwrap()
        .status()
}

// == PUT Endpoint Tests ==

#[tokio::test]
async fn test_put_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/put", r#"{"key":1,"value":"one"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], 1);
    assert_eq!(json["value"], "one");
    assert!(json["message"].as_str().unwrap().contains("created/updated"));
}

#[tokio::test]
async fn test_put_writes_through_to_store() {
    let state = create_test_state(10);
    let app = create_router(state.clone());

    assert_eq!(put(&app, 5, "five").await, StatusCode::OK);

    assert_eq!(state.store.get(5).unwrap(), Some("five".to_string()));
    assert_eq!(state.cache.get(&5), Some("five".to_string()));
}

#[tokio::test]
async fn test_put_overwrite() {
    let state = create_test_state(10);
    let app = create_router(state.clone());

    put(&app, 5, "five").await;
    put(&app, 5, "FIVE").await;

    assert_eq!(state.cache.len(), 1);
    assert_eq!(state.store.get(5).unwrap(), Some("FIVE".to_string()));

    let response = app
        .oneshot(post_json("/get", r#"{"key":5}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "FIVE");
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_from_cache() {
    let app = create_test_app();
    put(&app, 2, "two").await;

    let response = app
        .oneshot(post_json("/get", r#"{"key":2,"value":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], 2);
    assert_eq!(json["value"], "two");
    assert_eq!(json["source"], "cache");
}

#[tokio::test]
async fn test_get_endpoint_reads_through_on_miss() {
    let state = create_test_state(10);
    state.store.put(3, "three").unwrap();
    let app = create_router(state.clone());

    let response = app.clone().oneshot(get_uri("/get?key=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["source"], "store");

    let response = app.oneshot(get_uri("/get?key=3")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["source"], "cache");
    assert_eq!(json["value"], "three");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/get", r#"{"key":999}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Key 999 is not present");
}

#[tokio::test]
async fn test_get_accepts_capitalised_fields() {
    let app = create_test_app();
    put(&app, 4, "four").await;

    let response = app
        .oneshot(post_json("/get", r#"{"Key":4,"Value":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "four");
}

// == Eviction Through The API ==

#[tokio::test]
async fn test_evicted_key_is_served_from_store() {
    let state = create_test_state(2);
    let app = create_router(state.clone());

    put(&app, 1, "a").await;
    put(&app, 2, "b").await;
    // Refresh key 1 so key 2 becomes least recently used
    app.clone().oneshot(get_uri("/get?key=1")).await.unwrap();
    put(&app, 3, "c").await;

    assert_eq!(state.cache.len(), 2);
    assert_eq!(state.cache.keys_mru(), vec![3, 1]);

    let response = app.oneshot(get_uri("/get?key=2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "b");
    assert_eq!(json["source"], "store");
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let state = create_test_state(10);
    let app = create_router(state.clone());
    put(&app, 7, "seven").await;

    let response = app
        .clone()
        .oneshot(post_json("/delete", r#"{"key":7}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("deleted"));
    assert!(state.cache.is_empty());

    let response = app.oneshot(get_uri("/get?key=7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/delete", r#"{"key":12345}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Stats & Health ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();
    put(&app, 1, "one").await;
    app.clone().oneshot(get_uri("/get?key=1")).await.unwrap();
    app.clone().oneshot(get_uri("/get?key=2")).await.unwrap();

    let response = app.oneshot(get_uri("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["capacity"], 10);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get_uri("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_hello_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get_uri("/hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello");
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/put", r#"{"invalid json"#))
        .await
        .unwrap();

    // Axum returns 400 for syntax errors and 422 for shape errors
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_non_integer_key_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/put", r#"{"key":"abc","value":"x"}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == Concurrency Through The API ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_keep_cache_consistent() {
    let state = create_test_state(8);
    let app = create_router(state.clone());

    let mut handles = Vec::new();
    for worker in 0..16_i64 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..40_i64 {
                let key = (worker * 7 + i) % 24;
                match i % 3 {
                    0 => {
                        let body = format!(r#"{{"key":{},"value":"v{}"}}"#, key, key);
                        app.clone().oneshot(post_json("/put", &body)).await.unwrap();
                    }
                    1 => {
                        let uri = format!("/get?key={}", key);
                        app.clone().oneshot(get_uri(&uri)).await.unwrap();
                    }
                    _ => {
                        let body = format!(r#"{{"key":{}}}"#, key);
                        app.clone().oneshot(post_json("/delete", &body)).await.unwrap();
                    }
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(state.cache.len() <= 8);
    assert_eq!(state.cache.check_invariants(), Ok(()));
    for key in state.cache.keys_mru() {
        assert_eq!(state.cache.get(&key), Some(format!("v{}", key)));
    }
}
