// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (points balance, history, scan records)
//! - Credentials (password hashes for sign-in)

use crate::db::{
    collections, credential_doc_id, email_already_registered, CredentialStore, ProfileStore,
};
use crate::error::AppError;
use crate::models::{Credential, ProfileUpdate, UserProfile};
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any bearer token; skip credential discovery.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::ConfigurationMissing(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::ConfigurationMissing(format!(
                "Failed to connect to Firestore Emulator: {}",
                e
            ))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore Emulator");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return `ConfigurationMissing`.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::ConfigurationMissing("Database not connected (offline mode)".to_string())
        })
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    async fn read_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::PROFILES)
            .document_id(&profile.id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::StoreWriteFailure(e.to_string()))?;

        tracing::debug!(user_id = %profile.id, "Profile inserted");
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        if update.is_empty() {
            return Ok(());
        }

        // The update mask limits the write to the given fields; Firestore
        // applies a single document write atomically.
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(update.field_paths())
            .in_col(collections::PROFILES)
            .document_id(user_id)
            .object(update)
            .execute()
            .await
            .map_err(|e| AppError::StoreWriteFailure(e.to_string()))?;

        tracing::debug!(user_id, fields = ?update.field_paths(), "Profile updated");
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let username = username.to_string();
        let matches: Vec<UserProfile> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROFILES)
            .filter(move |q| q.for_all([q.field("username").eq(username.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(!matches.is_empty())
    }
}

#[async_trait]
impl CredentialStore for FirestoreDb {
    async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CREDENTIALS)
            .obj()
            .one(&credential_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_credential(&self, credential: &Credential) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::CREDENTIALS)
            .document_id(credential_doc_id(&credential.email))
            .object(credential)
            .execute()
            .await
            .map_err(|e| match e {
                firestore::errors::FirestoreError::DataConflictError(_) => {
                    email_already_registered()
                }
                other => AppError::StoreWriteFailure(other.to_string()),
            })?;
        Ok(())
    }

    async fn delete_credential(&self, email: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::CREDENTIALS)
            .document_id(credential_doc_id(email))
            .execute()
            .await
            .map_err(|e| AppError::StoreWriteFailure(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_mode_reports_missing_configuration() {
        let db = FirestoreDb::new_mock();

        let err = db.read_profile("user-1").await.unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing(_)));

        let err = db.delete_credential("a@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing(_)));
    }
}
