#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use recruitment_portal::{
    config::{Config, StorageBackend},
    routes,
    services::{memory_storage::MemoryStorage, storage::Storage},
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub fn test_config(uploads_dir: &Path) -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        uploads_dir: uploads_dir.to_path_buf(),
        api_rps: 10_000,
        chat_reply_delay_ms: 0,
        ..Config::default()
    }
}

pub fn app(config: Config) -> Router {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    routes::router(AppState::new(config, storage))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, JsonValue) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub fn signal_engineer() -> JsonValue {
    json!({
        "title": "Signal Engineer",
        "description": "Maintain interlocking and signalling systems",
        "department": "engineering",
        "jobType": "full_time",
        "location": "Jakarta",
        "isActive": true
    })
}

/// Registers a candidate and returns `(user_id, candidate_id)`.
pub async fn register_candidate(app: &Router, username: &str) -> (i64, i64) {
    let (status, body) = post(
        app,
        "/api/auth/register",
        json!({
            "username": username,
            "password": "pass-123",
            "email": format!("{}@example.com", username),
            "role": "candidate"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let user_id = body["data"]["id"].as_i64().unwrap();
    let (status, profile) = get(app, &format!("/api/users/{}/candidate", user_id)).await;
    assert_eq!(status, StatusCode::OK, "{}", profile);
    (user_id, profile["data"]["id"].as_i64().unwrap())
}

pub fn ids(list: &JsonValue) -> Vec<i64> {
    list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}
