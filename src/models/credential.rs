// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login credentials stored by the auth collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Password credential, stored in the `credentials` collection keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Profile ID this login belongs to
    pub user_id: String,
    /// Normalized email (trimmed, lowercase)
    pub email: String,
    /// PBKDF2 hash, `<iterations>$<salt b64>$<hash b64>`
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Normalize an email for use as a lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
