// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that JWT tokens issued at sign-in can be decoded with
//! the claims the auth middleware expects, catching compatibility issues early.

use chrono::{Duration, Utc};
use dustbin_rewards::middleware::auth::{create_jwt, decode_jwt};
use dustbin_rewards::services::Session;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims structure that must match what the middleware expects.
/// This is the canonical format - if either create_jwt or the middleware
/// changes, this test should catch the incompatibility.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    sid: String,
    exp: usize,
    iat: usize,
}

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

fn test_session(ttl: Duration) -> Session {
    let now = Utc::now();
    Session {
        session_id: "3f8e2a4c-session".to_string(),
        user_id: "b7d1c9e0-user".to_string(),
        issued_at: now,
        expires_at: now + ttl,
    }
}

#[test]
fn test_jwt_roundtrip() {
    let session = test_session(Duration::days(30));
    let token = create_jwt(&session, SIGNING_KEY).unwrap();

    // Decode token independently of the crate's helper
    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, session.user_id);
    assert_eq!(token_data.claims.sid, session.session_id);
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_jwt_expiration_matches_session() {
    let session = test_session(Duration::days(30));
    let token = create_jwt(&session, SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually

    let token_data = decode::<Claims>(&token, &key, &validation).unwrap();
    assert_eq!(
        token_data.claims.exp as i64,
        session.expires_at.timestamp()
    );
}

#[test]
fn test_expired_jwt_rejected() {
    let mut session = test_session(Duration::hours(1));
    session.issued_at -= Duration::hours(3);
    session.expires_at = session.issued_at + Duration::hours(1);

    let token = create_jwt(&session, SIGNING_KEY).unwrap();
    assert!(decode_jwt(&token, SIGNING_KEY).is_none());
}

#[test]
fn test_tampered_jwt_rejected() {
    let token = create_jwt(&test_session(Duration::hours(1)), SIGNING_KEY).unwrap();
    let mut tampered = token.clone();
    tampered.push('x');

    assert!(decode_jwt(&token, SIGNING_KEY).is_some());
    assert!(decode_jwt(&tampered, SIGNING_KEY).is_none());
}
