// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! The ledger persists through [`ProfileStore`]; the auth collaborator keeps
//! logins in a [`CredentialStore`]. Both are implemented by Firestore and by
//! a process-local store.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Credential, ProfileUpdate, UserProfile};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    /// Password credentials (keyed by encoded email)
    pub const CREDENTIALS: &str = "credentials";
}

/// Key-value store of user profiles, addressed by user ID.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read a profile. `Ok(None)` when no profile exists for the ID.
    async fn read_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError>;

    /// Create a profile. Fails if one already exists for the ID.
    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), AppError>;

    /// Replace the fields present in `update` as a single write.
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate)
        -> Result<(), AppError>;

    /// Whether any profile already uses `username`.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
}

/// Store of login credentials, addressed by normalized email.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError>;

    /// Create a credential. Fails with [`email_already_registered`] if the
    /// email is taken.
    async fn insert_credential(&self, credential: &Credential) -> Result<(), AppError>;

    /// Delete a credential (no error if absent).
    async fn delete_credential(&self, email: &str) -> Result<(), AppError>;
}

/// Error for a registration whose email already has a credential.
pub fn email_already_registered() -> AppError {
    AppError::AuthFailure("Email is already registered".to_string())
}

/// Document ID for a credential: emails may contain characters that are not
/// valid in document IDs.
pub fn credential_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}
