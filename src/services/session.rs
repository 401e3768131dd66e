// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Explicit user sessions.
//!
//! A session is created on sign-up or sign-in and ends on sign-out or
//! expiry. Session tokens reference a registered session, so a signed-out
//! token stops working even before its JWT expiry.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// An authenticated session for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Registry of live sessions, shared across request handlers.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session for `user_id`.
    pub fn open(&self, user_id: &str, ttl: Duration, now: DateTime<Utc>) -> Session {
        let session = Session {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            issued_at: now,
            expires_at: now + ttl,
        };
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        session
    }

    /// Look up a live session. Expired sessions are dropped on access.
    pub fn get_active(&self, session_id: &str, now: DateTime<Utc>) -> Option<Session> {
        let session = self.sessions.get(session_id)?.value().clone();
        if session.is_expired(now) {
            self.sessions.remove(session_id);
            return None;
        }
        Some(session)
    }

    /// End a session. Returns the session if it was live.
    pub fn close(&self, session_id: &str) -> Option<Session> {
        self.sessions.remove(session_id).map(|(_, s)| s)
    }

    /// Drop all expired sessions, returning how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired(now));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
