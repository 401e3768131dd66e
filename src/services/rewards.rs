// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward operations against the profile store.
//!
//! Every operation reads the profile fresh, applies the ledger to a copy,
//! and persists the touched fields in one [`ProfileUpdate`]. If the write
//! fails the copy is dropped and nothing is assumed to have changed.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::models::{merge_history, Coupon, CouponCatalog, HistoryItem, ProfileUpdate, UserProfile};
use crate::services::ledger::{RedeemReceipt, RewardLedger, ScanReceipt};

/// Number of items on the dashboard activity feed.
pub const DASHBOARD_ACTIVITY_LIMIT: usize = 5;

/// Dashboard counters for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub points: u64,
    pub total_scans: usize,
    pub total_redeemed: usize,
}

impl From<&UserProfile> for DashboardSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            points: profile.points,
            total_scans: profile.total_scans(),
            total_redeemed: profile.total_redeemed(),
        }
    }
}

/// A catalog coupon as seen by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponOffer {
    pub coupon: Coupon,
    pub can_redeem: bool,
}

/// Service for scanning, redeeming, and the read-only history views.
#[derive(Clone)]
pub struct RewardService {
    profiles: Arc<dyn ProfileStore>,
    ledger: RewardLedger,
    catalog: CouponCatalog,
}

impl RewardService {
    pub fn new(profiles: Arc<dyn ProfileStore>, ledger: RewardLedger, catalog: CouponCatalog) -> Self {
        Self {
            profiles,
            ledger,
            catalog,
        }
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        self.profiles
            .read_profile(user_id)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(user_id.to_string()))
    }

    /// Credit a scan of `decoded_text` for `user_id`.
    pub async fn scan(
        &self,
        user_id: &str,
        decoded_text: &str,
        now: DateTime<Utc>,
    ) -> Result<(ScanReceipt, UserProfile)> {
        let mut profile = self.profile(user_id).await?;

        let receipt = match self.ledger.record_scan(&mut profile, decoded_text, now) {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Scan rejected");
                return Err(e);
            }
        };

        self.profiles
            .update_profile(user_id, &ProfileUpdate::after_scan(&profile))
            .await
            .inspect_err(|e| tracing::error!(user_id, error = %e, "Failed to persist scan"))?;

        tracing::info!(
            user_id,
            first_scan = receipt.first_scan,
            points_earned = receipt.points_earned,
            balance = receipt.balance,
            "Scan accepted"
        );
        Ok((receipt, profile))
    }

    /// Redeem `coupon_id` for `user_id`.
    pub async fn redeem(
        &self,
        user_id: &str,
        coupon_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(RedeemReceipt, UserProfile)> {
        let coupon = self
            .catalog
            .find(coupon_id)
            .inspect_err(|_| tracing::warn!(user_id, coupon_id, "Unknown coupon"))?;

        let mut profile = self.profile(user_id).await?;

        let receipt = match self.ledger.redeem(&mut profile, coupon, now) {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(user_id, coupon_id, error = %e, "Redemption rejected");
                return Err(e);
            }
        };

        self.profiles
            .update_profile(user_id, &ProfileUpdate::after_redemption(&profile))
            .await
            .inspect_err(
                |e| tracing::error!(user_id, coupon_id, error = %e, "Failed to persist redemption"),
            )?;

        tracing::info!(
            user_id,
            coupon_id,
            points_used = receipt.points_used,
            balance = receipt.balance,
            "Coupon redeemed"
        );
        Ok((receipt, profile))
    }

    /// Full merged history, most recent first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<HistoryItem>> {
        let profile = self.profile(user_id).await?;
        Ok(merge_history(
            &profile.points_history,
            &profile.redeemed_coupons,
        ))
    }

    /// The `limit` most recent history items.
    pub async fn recent_activity(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryItem>> {
        let mut items = self.history(user_id).await?;
        items.truncate(limit);
        Ok(items)
    }

    /// Catalog with per-user redeemability.
    pub async fn coupons(&self, user_id: &str) -> Result<Vec<CouponOffer>> {
        let profile = self.profile(user_id).await?;
        Ok(self
            .catalog
            .coupons()
            .iter()
            .map(|coupon| CouponOffer {
                coupon: coupon.clone(),
                can_redeem: profile.points >= coupon.points_cost,
            })
            .collect())
    }

    pub async fn dashboard(&self, user_id: &str) -> Result<(UserProfile, DashboardSummary)> {
        let profile = self.profile(user_id).await?;
        let summary = DashboardSummary::from(&profile);
        Ok((profile, summary))
    }
}
