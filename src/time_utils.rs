// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whole minutes left in a duration, rounded up.
///
/// Any non-empty remainder counts as a full minute, so 61 seconds is 2.
pub fn minutes_remaining(remaining: Duration) -> i64 {
    if remaining <= Duration::zero() {
        return 0;
    }
    ((remaining.num_milliseconds() + 59_999) / 60_000).max(1)
}
