// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: register, log in, log out.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{extract_token, SESSION_COOKIE};
use crate::routes::api::ProfileResponse;
use crate::services::SignedIn;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 40, message = "Username must be 1-40 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Session token plus the signed-in profile.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub token: String,
    pub profile: ProfileResponse,
}

/// Create an account and sign in.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    body.validate()?;

    let signed = state
        .auth
        .sign_up(
            body.username.trim(),
            &body.email,
            &body.password,
            chrono::Utc::now(),
        )
        .await?;

    let (jar, response) = session_response(&state, jar, signed);
    Ok((StatusCode::CREATED, jar, response))
}

/// Sign in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    body.validate()?;

    let signed = state
        .auth
        .sign_in(&body.email, &body.password, chrono::Utc::now())
        .await?;

    Ok(session_response(&state, jar, signed))
}

/// End the current session (if any) and clear the cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (StatusCode, CookieJar) {
    if let Some(token) = extract_token(&jar, &headers) {
        if let Ok(session) = state.auth.current_user(&token, chrono::Utc::now()) {
            state.auth.sign_out(&session.session_id);
        }
    }

    let jar = jar.remove(session_cookie(&state, String::new()));
    (StatusCode::NO_CONTENT, jar)
}

/// Session cookie with the attributes used both to set and to remove it.
fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(state.config.frontend_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .build()
}

fn session_response(
    state: &AppState,
    jar: CookieJar,
    signed: SignedIn,
) -> (CookieJar, Json<SessionResponse>) {
    let max_age = (signed.session.expires_at - signed.session.issued_at).num_seconds();
    let mut cookie = session_cookie(state, signed.token.clone());
    cookie.set_max_age(time::Duration::seconds(max_age));

    (
        jar.add(cookie),
        Json(SessionResponse {
            token: signed.token,
            profile: ProfileResponse::from(&signed.profile),
        }),
    )
}
