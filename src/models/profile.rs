// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage and API.
//!
//! A profile holds the whole ledger state for one account: the balance, the
//! append-only points history, redemptions, and the per-code scan records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of point-affecting event recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LedgerAction {
    WelcomeBonus,
    QrScan,
    CouponRedeem,
}

/// One entry in a user's points history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub action: LedgerAction,
    /// Signed point delta (negative for redemptions)
    pub points: i64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// A coupon redeemed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    pub coupon_id: String,
    pub coupon_name: String,
    pub points_used: u64,
    pub redeemed_at: DateTime<Utc>,
}

/// Last time a given code was credited to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub code_id: String,
    pub last_scanned_at: DateTime<Utc>,
}

/// User profile stored in the `profiles` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque user ID assigned at sign-up (also used as document ID)
    pub id: String,
    pub username: String,
    pub email: String,
    /// Current balance
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub points_history: Vec<LedgerEntry>,
    #[serde(default)]
    pub redeemed_coupons: Vec<Redemption>,
    /// At most one record per code
    #[serde(default)]
    pub scanned_codes: Vec<ScanRecord>,
    /// When the account was registered
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl UserProfile {
    /// Scan record for a code, if the user has ever been credited for it.
    pub fn scan_record(&self, code_id: &str) -> Option<&ScanRecord> {
        self.scanned_codes.iter().find(|r| r.code_id == code_id)
    }

    pub fn scan_record_mut(&mut self, code_id: &str) -> Option<&mut ScanRecord> {
        self.scanned_codes.iter_mut().find(|r| r.code_id == code_id)
    }

    /// Number of accepted QR scans.
    pub fn total_scans(&self) -> usize {
        self.points_history
            .iter()
            .filter(|e| e.action == LedgerAction::QrScan)
            .count()
    }

    /// Number of coupons redeemed.
    pub fn total_redeemed(&self) -> usize {
        self.redeemed_coupons.len()
    }
}

/// Partial profile write: every field that is `Some` replaces the stored
/// value wholesale, in a single store update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_history: Option<Vec<LedgerEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redeemed_coupons: Option<Vec<Redemption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_codes: Option<Vec<ScanRecord>>,
}

impl ProfileUpdate {
    /// Fields touched by an accepted scan.
    pub fn after_scan(profile: &UserProfile) -> Self {
        Self {
            points: Some(profile.points),
            points_history: Some(profile.points_history.clone()),
            scanned_codes: Some(profile.scanned_codes.clone()),
            ..Self::default()
        }
    }

    /// Fields touched by an accepted redemption.
    pub fn after_redemption(profile: &UserProfile) -> Self {
        Self {
            points: Some(profile.points),
            points_history: Some(profile.points_history.clone()),
            redeemed_coupons: Some(profile.redeemed_coupons.clone()),
            ..Self::default()
        }
    }

    /// Document field paths present in this update (used as the update mask).
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::with_capacity(4);
        if self.points.is_some() {
            paths.push("points");
        }
        if self.points_history.is_some() {
            paths.push("points_history");
        }
        if self.redeemed_coupons.is_some() {
            paths.push("redeemed_coupons");
        }
        if self.scanned_codes.is_some() {
            paths.push("scanned_codes");
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.field_paths().is_empty()
    }

    /// Apply this update to an in-memory profile.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(points) = self.points {
            profile.points = points;
        }
        if let Some(history) = &self.points_history {
            profile.points_history = history.clone();
        }
        if let Some(redeemed) = &self.redeemed_coupons {
            profile.redeemed_coupons = redeemed.clone();
        }
        if let Some(scanned) = &self.scanned_codes {
            profile.scanned_codes = scanned.clone();
        }
    }
}
