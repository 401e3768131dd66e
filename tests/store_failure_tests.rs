// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Store failure handling.
//!
//! A failed profile write must leave the stored profile as it was, and a
//! failed registration must not leave a dangling credential behind.

use axum::http::StatusCode;
use dustbin_rewards::db::{CredentialStore, ProfileStore};
use serde_json::json;

mod common;
use common::{json_body, register_user, send, TEST_QR_CODE};

#[tokio::test]
async fn test_failed_scan_write_leaves_balance_unchanged() {
    let (app, state, store) = common::create_test_app();
    let token = register_user(&app, "ada").await;
    let user_id = state.auth.current_user(&token, chrono::Utc::now()).unwrap().user_id;

    store.set_fail_profile_writes(true);
    let response = send(&app, "POST", "/api/scan", Some(&token), Some(json!({ "code": TEST_QR_CODE }))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "store_write_failure");

    let profile = store.read_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(profile.points, 100);
    assert_eq!(profile.points_history.len(), 1);
    assert!(profile.scanned_codes.is_empty());

    // Once writes succeed again the scan is not blocked by a cooldown
    store.set_fail_profile_writes(false);
    let response = send(&app, "POST", "/api/scan", Some(&token), Some(json!({ "code": TEST_QR_CODE }))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_failed_redeem_write_leaves_balance_unchanged() {
    let (app, state, store) = common::create_test_app();
    let token = register_user(&app, "ada").await;
    let user_id = state.auth.current_user(&token, chrono::Utc::now()).unwrap().user_id;

    store.set_fail_profile_writes(true);
    let response = send(&app, "POST", "/api/coupons/coupon1/redeem", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let profile = store.read_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(profile.points, 100);
    assert!(profile.redeemed_coupons.is_empty());
}

#[tokio::test]
async fn test_failed_registration_rolls_back_credential() {
    let (app, _, store) = common::create_test_app();
    store.set_fail_profile_writes(true);

    let response = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "username": "ada", "email": "ada@example.com", "password": "recycle-me" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(store.get_credential("ada@example.com").await.unwrap().is_none());

    // The email can be used again
    store.set_fail_profile_writes(false);
    register_user(&app, "ada").await;
}

#[tokio::test]
async fn test_offline_store_reports_unavailable() {
    let app = common::create_offline_firestore_app();

    let response = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "recycle-me" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["error"], "configuration_missing");
}
