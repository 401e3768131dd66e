// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points ledger rules.
//!
//! All balance changes go through [`RewardLedger`]. The ledger works on an
//! in-memory profile and never touches the store; callers persist the
//! resulting [`ProfileUpdate`](crate::models::ProfileUpdate) in one write.
//!
//! Invariants upheld here:
//! - `points` never goes below zero (redemptions are checked first)
//! - every balance change appends exactly one history entry
//! - at most one scan record exists per code

use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Coupon, LedgerAction, LedgerEntry, Redemption, ScanRecord, UserProfile};

/// Max characters of the code shown in a scan history description.
const SCAN_DESCRIPTION_CODE_CHARS: usize = 30;

/// Tunable reward rules.
#[derive(Debug, Clone)]
pub struct LedgerRules {
    /// The only decoded text that earns points
    pub expected_code: String,
    pub points_per_scan: u64,
    pub welcome_bonus: u64,
    pub cooldown: Duration,
}

impl From<&Config> for LedgerRules {
    fn from(config: &Config) -> Self {
        Self {
            expected_code: config.expected_qr_content.clone(),
            points_per_scan: config.points_per_scan,
            welcome_bonus: config.welcome_bonus,
            cooldown: config.scan_cooldown,
        }
    }
}

/// Outcome of an accepted scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReceipt {
    /// True when the user had never been credited for this code
    pub first_scan: bool,
    pub points_earned: u64,
    pub balance: u64,
}

/// Outcome of an accepted redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemReceipt {
    pub coupon_id: String,
    pub coupon_name: String,
    pub points_used: u64,
    pub balance: u64,
}

/// Enforces the balance, history, and scan-cooldown rules.
#[derive(Debug, Clone)]
pub struct RewardLedger {
    rules: LedgerRules,
}

impl RewardLedger {
    pub fn new(rules: LedgerRules) -> Self {
        Self { rules }
    }

    /// Build the profile for a freshly registered account, seeded with the
    /// welcome bonus.
    pub fn open_profile(
        &self,
        id: String,
        username: String,
        email: String,
        now: DateTime<Utc>,
    ) -> UserProfile {
        let bonus = self.rules.welcome_bonus;
        let points_history = if bonus > 0 {
            vec![LedgerEntry {
                action: LedgerAction::WelcomeBonus,
                points: bonus as i64,
                description: "Welcome bonus".to_string(),
                timestamp: now,
            }]
        } else {
            Vec::new()
        };

        UserProfile {
            id,
            username,
            email,
            points: bonus,
            points_history,
            redeemed_coupons: Vec::new(),
            scanned_codes: Vec::new(),
            created_at: now,
        }
    }

    /// Credit a scan of `decoded_text` at `now`.
    ///
    /// On error the profile is left untouched.
    pub fn record_scan(
        &self,
        profile: &mut UserProfile,
        decoded_text: &str,
        now: DateTime<Utc>,
    ) -> Result<ScanReceipt> {
        if decoded_text != self.rules.expected_code {
            return Err(AppError::UnrecognizedCode);
        }
        let code_id = decoded_text;

        let first_scan = match profile.scan_record(code_id) {
            None => true,
            Some(record) => {
                let elapsed = now - record.last_scanned_at;
                // A clock that moved backwards counts as still cooling down
                if elapsed < self.rules.cooldown {
                    return Err(AppError::CooldownActive {
                        remaining: self.rules.cooldown - elapsed.max(Duration::zero()),
                    });
                }
                false
            }
        };

        let balance = profile
            .points
            .checked_add(self.rules.points_per_scan)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Points balance overflow")))?;

        match profile.scan_record_mut(code_id) {
            Some(record) => record.last_scanned_at = now,
            None => profile.scanned_codes.push(ScanRecord {
                code_id: code_id.to_string(),
                last_scanned_at: now,
            }),
        }
        profile.points = balance;
        profile.points_history.push(LedgerEntry {
            action: LedgerAction::QrScan,
            points: self.rules.points_per_scan as i64,
            description: scan_description(code_id),
            timestamp: now,
        });

        Ok(ScanReceipt {
            first_scan,
            points_earned: self.rules.points_per_scan,
            balance,
        })
    }

    /// Spend points on `coupon`.
    ///
    /// On error the profile is left untouched.
    pub fn redeem(
        &self,
        profile: &mut UserProfile,
        coupon: &Coupon,
        now: DateTime<Utc>,
    ) -> Result<RedeemReceipt> {
        let balance = profile
            .points
            .checked_sub(coupon.points_cost)
            .ok_or(AppError::InsufficientPoints {
                balance: profile.points,
                cost: coupon.points_cost,
            })?;

        profile.points = balance;
        profile.redeemed_coupons.push(Redemption {
            coupon_id: coupon.id.clone(),
            coupon_name: coupon.name.clone(),
            points_used: coupon.points_cost,
            redeemed_at: now,
        });
        profile.points_history.push(LedgerEntry {
            action: LedgerAction::CouponRedeem,
            points: -(coupon.points_cost as i64),
            description: format!("Redeemed {}", coupon.name),
            timestamp: now,
        });

        Ok(RedeemReceipt {
            coupon_id: coupon.id.clone(),
            coupon_name: coupon.name.clone(),
            points_used: coupon.points_cost,
            balance,
        })
    }
}

/// History description for a scan, with the code shortened for display.
fn scan_description(code_id: &str) -> String {
    let short: String = code_id.chars().take(SCAN_DESCRIPTION_CODE_CHARS).collect();
    format!("Scanned Dust Bin QR ({}...)", short)
}
