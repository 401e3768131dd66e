// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod coupon;
pub mod credential;
pub mod history;
pub mod profile;

pub use coupon::{Coupon, CouponCatalog};
pub use credential::Credential;
pub use history::{merge_history, HistoryItem, HistorySource};
pub use profile::{LedgerAction, LedgerEntry, ProfileUpdate, Redemption, ScanRecord, UserProfile};
