// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local store for local development and tests.
//!
//! Data lives only as long as the process. Profile writes can be made to
//! fail on demand to exercise store-failure handling.

use crate::db::{email_already_registered, CredentialStore, ProfileStore};
use crate::error::AppError;
use crate::models::{Credential, ProfileUpdate, UserProfile};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory profile and credential store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<DashMap<String, UserProfile>>,
    credentials: Arc<DashMap<String, Credential>>,
    fail_profile_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent profile inserts and updates fail with
    /// `StoreWriteFailure` (or succeed again when `false`).
    pub fn set_fail_profile_writes(&self, fail: bool) {
        self.fail_profile_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_profile_writes.load(Ordering::SeqCst) {
            return Err(AppError::StoreWriteFailure(
                "profile writes disabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn read_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.get(user_id).map(|p| p.value().clone()))
    }

    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        self.check_writable()?;
        match self.profiles.entry(profile.id.clone()) {
            Entry::Occupied(_) => Err(AppError::StoreWriteFailure(format!(
                "profile {} already exists",
                profile.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(())
            }
        }
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        self.check_writable()?;
        let mut profile = self.profiles.get_mut(user_id).ok_or_else(|| {
            AppError::StoreWriteFailure(format!("profile {} does not exist", user_id))
        })?;
        // The shard lock is held for the whole update
        update.apply_to(profile.value_mut());
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.profiles.iter().any(|p| p.username == username))
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        Ok(self.credentials.get(email).map(|c| c.value().clone()))
    }

    async fn insert_credential(&self, credential: &Credential) -> Result<(), AppError> {
        match self.credentials.entry(credential.email.clone()) {
            Entry::Occupied(_) => Err(email_already_registered()),
            Entry::Vacant(slot) => {
                slot.insert(credential.clone());
                Ok(())
            }
        }
    }

    async fn delete_credential(&self, email: &str) -> Result<(), AppError> {
        self.credentials.remove(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(id: &str, username: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            points: 100,
            points_history: vec![],
            redeemed_coupons: vec![],
            scanned_codes: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_read_update() {
        let store = MemoryStore::new();
        store.insert_profile(&profile("u1", "ada")).await.unwrap();

        let update = ProfileUpdate {
            points: Some(1100),
            ..ProfileUpdate::default()
        };
        store.update_profile("u1", &update).await.unwrap();

        let read = store.read_profile("u1").await.unwrap().unwrap();
        assert_eq!(read.points, 1100);
        assert_eq!(read.username, "ada");
        assert!(store.username_exists("ada").await.unwrap());
        assert!(!store.username_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let store = MemoryStore::new();
        store.insert_profile(&profile("u1", "ada")).await.unwrap();

        let err = store.insert_profile(&profile("u1", "ada")).await.unwrap_err();
        assert!(matches!(err, AppError::StoreWriteFailure(_)));
    }

    #[tokio::test]
    async fn test_duplicate_credential_is_auth_failure() {
        let store = MemoryStore::new();
        let credential = Credential {
            user_id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        store.insert_credential(&credential).await.unwrap();

        let err = store
            .insert_credential(&Credential {
                user_id: "u2".to_string(),
                ..credential
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthFailure(_)));
        assert_eq!(
            store.get_credential("ada@example.com").await.unwrap().unwrap().user_id,
            "u1"
        );
    }

    #[tokio::test]
    async fn test_update_missing_profile_fails() {
        let store = MemoryStore::new();
        let err = store
            .update_profile("nobody", &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StoreWriteFailure(_)));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.insert_profile(&profile("u1", "ada")).await.unwrap();
        store.set_fail_profile_writes(true);

        let update = ProfileUpdate {
            points: Some(5),
            ..ProfileUpdate::default()
        };
        assert!(store.update_profile("u1", &update).await.is_err());
        assert_eq!(store.read_profile("u1").await.unwrap().unwrap().points, 100);

        store.set_fail_profile_writes(false);
        store.update_profile("u1", &update).await.unwrap();
        assert_eq!(store.read_profile("u1").await.unwrap().unwrap().points, 5);
    }
}
