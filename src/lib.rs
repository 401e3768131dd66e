// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Dustbin Rewards: earn points for using the smart dustbin
//!
//! This crate provides the backend API for scanning the dustbin QR code,
//! tracking each user's points ledger, and redeeming partner coupons.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{CredentialStore, ProfileStore};
use models::CouponCatalog;
use services::{AuthService, LedgerRules, RewardLedger, RewardService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub rewards: RewardService,
}

impl AppState {
    /// Wire the services to a store that holds both profiles and credentials.
    pub fn new<S>(config: Config, store: Arc<S>, catalog: CouponCatalog) -> Self
    where
        S: ProfileStore + CredentialStore + 'static,
    {
        let ledger = RewardLedger::new(LedgerRules::from(&config));
        let profiles: Arc<dyn ProfileStore> = store.clone();
        let credentials: Arc<dyn CredentialStore> = store;

        let auth = AuthService::new(
            profiles.clone(),
            credentials,
            ledger.clone(),
            config.jwt_signing_key.clone(),
            config.session_ttl,
        );
        let rewards = RewardService::new(profiles, ledger, catalog);

        Self {
            config,
            auth,
            rewards,
        }
    }
}
