// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod ledger;
pub mod password;
pub mod rewards;
pub mod session;

pub use auth::{AuthService, SignedIn};
pub use ledger::{LedgerRules, RedeemReceipt, RewardLedger, ScanReceipt};
pub use rewards::{CouponOffer, DashboardSummary, RewardService};
pub use session::{Session, SessionRegistry};
