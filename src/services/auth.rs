// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration, sign-in, and session lookup.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::db::{email_already_registered, CredentialStore, ProfileStore};
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, decode_jwt};
use crate::models::credential::normalize_email;
use crate::models::{Credential, UserProfile};
use crate::services::ledger::RewardLedger;
use crate::services::password::{hash_password, verify_password};
use crate::services::session::{Session, SessionRegistry};

const INVALID_LOGIN: &str = "Invalid email or password";

/// A successful sign-up or sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    /// Signed JWT referencing `session`
    pub token: String,
    pub profile: UserProfile,
}

/// Service for account and session management.
#[derive(Clone)]
pub struct AuthService {
    profiles: Arc<dyn ProfileStore>,
    credentials: Arc<dyn CredentialStore>,
    ledger: RewardLedger,
    sessions: SessionRegistry,
    signing_key: Vec<u8>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        credentials: Arc<dyn CredentialStore>,
        ledger: RewardLedger,
        signing_key: Vec<u8>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            profiles,
            credentials,
            ledger,
            sessions: SessionRegistry::new(),
            signing_key,
            session_ttl,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Register a new account and open its profile.
    ///
    /// If the profile cannot be written, the credential is removed again so
    /// the email can be reused.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedIn> {
        let username = username.trim();
        let email = normalize_email(email);

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::BadRequest(
                "Username, email, and password are required".to_string(),
            ));
        }

        if self.profiles.username_exists(username).await? {
            tracing::warn!(username, "Registration rejected: username taken");
            return Err(AppError::UsernameTaken(username.to_string()));
        }

        if self.credentials.get_credential(&email).await?.is_some() {
            tracing::warn!("Registration rejected: email already registered");
            return Err(email_already_registered());
        }

        let user_id = uuid::Uuid::new_v4().to_string();
        let credential = Credential {
            user_id: user_id.clone(),
            email: email.clone(),
            password_hash: hash_password(password)?,
            created_at: now,
        };
        // Another registration may have claimed the email since the check
        self.credentials
            .insert_credential(&credential)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Credential insert rejected"))?;

        let profile = self
            .ledger
            .open_profile(user_id.clone(), username.to_string(), email.clone(), now);

        if let Err(e) = self.profiles.insert_profile(&profile).await {
            tracing::error!(user_id = %user_id, error = %e, "Profile insert failed, rolling back credential");
            if let Err(rollback) = self.credentials.delete_credential(&email).await {
                tracing::error!(user_id = %user_id, error = %rollback, "Credential rollback failed");
            }
            return Err(AppError::StoreWriteFailure(format!(
                "Failed to create profile: {}",
                e
            )));
        }

        tracing::info!(user_id = %user_id, username, "Account registered");
        self.start_session(profile, now)
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<SignedIn> {
        let email = normalize_email(email);

        let credential = match self.credentials.get_credential(&email).await? {
            Some(c) if verify_password(password, &c.password_hash) => c,
            _ => {
                tracing::warn!("Sign-in rejected");
                return Err(AppError::AuthFailure(INVALID_LOGIN.to_string()));
            }
        };

        let profile = self
            .profiles
            .read_profile(&credential.user_id)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(credential.user_id.clone()))?;

        tracing::info!(user_id = %profile.id, "Signed in");
        self.start_session(profile, now)
    }

    /// End a session. Signing out twice is not an error.
    pub fn sign_out(&self, session_id: &str) {
        if let Some(session) = self.sessions.close(session_id) {
            tracing::info!(user_id = %session.user_id, "Signed out");
        }
    }

    /// Resolve a session token to its live session.
    pub fn current_user(&self, token: &str, now: DateTime<Utc>) -> Result<Session> {
        let claims = decode_jwt(token, &self.signing_key)
            .ok_or_else(|| AppError::AuthFailure("Invalid or expired token".to_string()))?;

        match self.sessions.get_active(&claims.sid, now) {
            Some(session) if session.user_id == claims.sub => Ok(session),
            _ => Err(AppError::AuthFailure("Session has ended".to_string())),
        }
    }

    fn start_session(&self, profile: UserProfile, now: DateTime<Utc>) -> Result<SignedIn> {
        let session = self.sessions.open(&profile.id, self.session_ttl, now);
        let token = create_jwt(&session, &self.signing_key)?;
        Ok(SignedIn {
            session,
            token,
            profile,
        })
    }
}
