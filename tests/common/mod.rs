// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use dustbin_rewards::config::Config;
use dustbin_rewards::db::{FirestoreDb, MemoryStore};
use dustbin_rewards::models::CouponCatalog;
use dustbin_rewards::routes::create_router;
use dustbin_rewards::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// The QR content accepted by `Config::test_default()`.
#[allow(dead_code)]
pub const TEST_QR_CODE: &str = "https://qrco.de/bgBWbc";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app on a fresh in-memory store.
/// Returns the router, the shared state, and the store (for failure injection).
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let state = Arc::new(AppState::new(
        config,
        Arc::new(store.clone()),
        CouponCatalog::default(),
    ));

    (create_router(state.clone()), state, store)
}

/// Create a test app whose store is an offline Firestore client.
#[allow(dead_code)]
pub fn create_offline_firestore_app() -> axum::Router {
    let state = Arc::new(AppState::new(
        Config::test_default(),
        Arc::new(FirestoreDb::new_mock()),
        CouponCatalog::default(),
    ));
    create_router(state)
}

/// Send a request, optionally with a bearer token and JSON body.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return its session token.
#[allow(dead_code)]
pub async fn register_user(app: &axum::Router, username: &str) -> String {
    let response = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "recycle-me",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
