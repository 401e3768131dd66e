// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display projection of a user's history.
//!
//! Ledger entries and redemptions are stored separately; the UI shows them
//! as one reverse-chronological feed.

use chrono::{DateTime, Utc};

use crate::models::profile::{LedgerAction, LedgerEntry, Redemption};

/// Where a history item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    Ledger,
    Redemption,
}

/// One row of the merged history feed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub source: HistorySource,
    pub action: LedgerAction,
    pub points: i64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&LedgerEntry> for HistoryItem {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            source: HistorySource::Ledger,
            action: entry.action,
            points: entry.points,
            description: entry.description.clone(),
            timestamp: entry.timestamp,
        }
    }
}

impl From<&Redemption> for HistoryItem {
    fn from(redemption: &Redemption) -> Self {
        Self {
            source: HistorySource::Redemption,
            action: LedgerAction::CouponRedeem,
            points: -(redemption.points_used as i64),
            description: format!("Redeemed {}", redemption.coupon_name),
            timestamp: redemption.redeemed_at,
        }
    }
}

/// Merge ledger entries and redemptions, most recent first.
///
/// Equal timestamps keep input order: ledger entries before redemptions,
/// each in stored order.
pub fn merge_history(entries: &[LedgerEntry], redemptions: &[Redemption]) -> Vec<HistoryItem> {
    let mut items: Vec<HistoryItem> = entries
        .iter()
        .map(HistoryItem::from)
        .chain(redemptions.iter().map(HistoryItem::from))
        .collect();

    // sort_by is stable
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items
}
