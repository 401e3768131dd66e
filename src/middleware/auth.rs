// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::error::AppError;
use crate::services::session::Session;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "rewards_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (profile ID)
    pub sub: String,
    /// Session ID in the session registry
    pub sid: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub session_id: String,
}

impl From<Session> for AuthUser {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            session_id: session.session_id,
        }
    }
}

/// Extract the session token: cookie first, then bearer header.
pub fn extract_token(jar: &CookieJar, headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, request.headers())
        .ok_or_else(|| AppError::AuthFailure("Not signed in".to_string()))?;

    let session = state.auth.current_user(&token, chrono::Utc::now())?;

    request.extensions_mut().insert(AuthUser::from(session));

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(session: &Session, signing_key: &[u8]) -> anyhow::Result<String> {
    let claims = Claims {
        sub: session.user_id.clone(),
        sid: session.session_id.clone(),
        iat: session.issued_at.timestamp().max(0) as usize,
        exp: session.expires_at.timestamp().max(0) as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Decode and verify a session JWT (signature and expiry).
pub fn decode_jwt(token: &str, signing_key: &[u8]) -> Option<Claims> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session() -> Session {
        let now = Utc::now();
        Session {
            session_id: "sid-1".to_string(),
            user_id: "user-1".to_string(),
            issued_at: now,
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let key = b"test_jwt_key_32_bytes_minimum!!";
        let token = create_jwt(&session(), key).unwrap();

        let claims = decode_jwt(&token, key).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.sid, "sid-1");
    }

    #[test]
    fn test_jwt_wrong_key_rejected() {
        let token = create_jwt(&session(), b"test_jwt_key_32_bytes_minimum!!").unwrap();
        assert!(decode_jwt(&token, b"another_key_that_is_long_enough").is_none());
    }

    #[test]
    fn test_bearer_header_token() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());

        assert_eq!(
            extract_token(&CookieJar::new(), &headers),
            Some("abc".to_string())
        );
        assert_eq!(
            extract_token(&CookieJar::new(), &axum::http::HeaderMap::new()),
            None
        );
    }
}
