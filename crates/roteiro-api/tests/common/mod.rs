//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use roteiro_api::routes;
use roteiro_api::state::AppState;
use roteiro_core::clock::Clock;
use roteiro_script::ScriptRepository;
use roteiro_sync::SyncLayer;
use roteiro_test_support::{FixedClock, MemoryStorage};

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over in-memory storage and a deterministic
/// clock. Uses the same route structure as `main.rs`. The router is cloned
/// per request, so one app serves a whole scenario.
pub fn build_test_app() -> Router {
    let storage = Arc::new(MemoryStorage::new());
    build_test_app_with_storage(storage)
}

/// Build the app over a caller-supplied storage, for asserting on what was
/// physically persisted.
pub fn build_test_app_with_storage(storage: Arc<MemoryStorage>) -> Router {
    let clock = fixed_clock();
    let sync = Arc::new(SyncLayer::new(storage, clock.clone()));
    let repository = Arc::new(ScriptRepository::empty(sync));
    let app_state = AppState::new(repository, clock);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/steps", routes::steps::router())
        .nest("/api/v1/products", routes::products::router())
        .nest("/api/v1/transfer", routes::transfer::router())
        .nest("/api/v1/sessions", routes::session::router())
        .with_state(app_state)
}

/// Send a request with a JSON body and return the response.
async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "PUT", uri, body).await
}

/// Send a GET request and return the response parsed as JSON.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the raw body plus its content type.
pub async fn get_raw(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|value| value.to_str().unwrap().to_owned());
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (
        status,
        String::from_utf8(body_bytes.to_vec()).unwrap(),
        content_type,
    )
}

/// Send a DELETE request and return the status.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.oneshot(request).await.unwrap().status()
}

/// ACME fixture bundle: two steps, a forward button and a call-closing
/// button.
pub fn acme_bundle() -> serde_json::Value {
    serde_json::json!({
        "marcas": {
            "ACME": {
                "s1": {
                    "id": "s1",
                    "title": "Start",
                    "body": "Hi [Primeiro nome do cliente]",
                    "buttons": [
                        {"label": "Next", "next": "s2"},
                        {"label": "End", "next": "fim"}
                    ]
                },
                "s2": {
                    "id": "s2",
                    "title": "End",
                    "body": "Bye",
                    "buttons": []
                }
            }
        }
    })
}
