// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{HistoryItem, HistorySource, LedgerAction, UserProfile};
use crate::services::{CouponOffer, DashboardSummary};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_ACTIVITY_LIMIT: usize = crate::services::rewards::DASHBOARD_ACTIVITY_LIMIT;
const MAX_ACTIVITY_LIMIT: usize = 50;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/scan", post(scan))
        .route("/api/coupons", get(list_coupons))
        .route("/api/coupons/{coupon_id}/redeem", post(redeem_coupon))
        .route("/api/history", get(get_history))
        .route("/api/activity", get(get_activity))
}

// ─── User Profile ────────────────────────────────────────────

/// Public view of a profile.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    pub created_at: String,
}

impl From<&UserProfile> for ProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            username: profile.username.clone(),
            email: profile.email.clone(),
            points: profile.points,
            created_at: format_utc_rfc3339(profile.created_at),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_scans: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_redeemed: usize,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            points: summary.points,
            total_scans: summary.total_scans,
            total_redeemed: summary.total_redeemed,
        }
    }
}

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub profile: ProfileResponse,
    pub dashboard: DashboardResponse,
}

/// Get current user profile and dashboard counters.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let (profile, summary) = state.rewards.dashboard(&user.user_id).await?;

    Ok(Json(MeResponse {
        profile: ProfileResponse::from(&profile),
        dashboard: summary.into(),
    }))
}

// ─── Scanning ────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct ScanRequest {
    /// Decoded QR text
    #[validate(length(min = 1, max = 2048, message = "Code must not be empty"))]
    pub code: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScanResponse {
    pub first_scan: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_earned: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    pub message: String,
}

/// Submit a decoded QR code.
async fn scan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<ScanResponse>> {
    body.validate()?;

    let (receipt, _) = state
        .rewards
        .scan(&user.user_id, &body.code, chrono::Utc::now())
        .await?;

    Ok(Json(ScanResponse {
        first_scan: receipt.first_scan,
        points_earned: receipt.points_earned,
        points: receipt.balance,
        message: format!("Success! You earned {} points!", receipt.points_earned),
    }))
}

// ─── Coupons ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CouponResponse {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_cost: u64,
    pub can_redeem: bool,
}

impl From<CouponOffer> for CouponResponse {
    fn from(offer: CouponOffer) -> Self {
        Self {
            id: offer.coupon.id,
            name: offer.coupon.name,
            points_cost: offer.coupon.points_cost,
            can_redeem: offer.can_redeem,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CouponsResponse {
    pub coupons: Vec<CouponResponse>,
}

async fn list_coupons(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CouponsResponse>> {
    let offers = state.rewards.coupons(&user.user_id).await?;

    Ok(Json(CouponsResponse {
        coupons: offers.into_iter().map(CouponResponse::from).collect(),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RedeemResponse {
    pub coupon_id: String,
    pub coupon_name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_used: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    pub message: String,
}

async fn redeem_coupon(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(coupon_id): Path<String>,
) -> Result<Json<RedeemResponse>> {
    let (receipt, _) = state
        .rewards
        .redeem(&user.user_id, &coupon_id, chrono::Utc::now())
        .await?;

    let message = format!("Successfully redeemed {}!", receipt.coupon_name);
    Ok(Json(RedeemResponse {
        coupon_id: receipt.coupon_id,
        coupon_name: receipt.coupon_name,
        points_used: receipt.points_used,
        points: receipt.balance,
        message,
    }))
}

// ─── History ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryItemResponse {
    /// "ledger" or "redemption"
    pub source: String,
    pub action: LedgerAction,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: i64,
    pub description: String,
    pub timestamp: String,
}

impl From<HistoryItem> for HistoryItemResponse {
    fn from(item: HistoryItem) -> Self {
        let source = match item.source {
            HistorySource::Ledger => "ledger",
            HistorySource::Redemption => "redemption",
        };
        Self {
            source: source.to_string(),
            action: item.action,
            points: item.points,
            description: item.description,
            timestamp: format_utc_rfc3339(item.timestamp),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryResponse {
    pub items: Vec<HistoryItemResponse>,
}

impl From<Vec<HistoryItem>> for HistoryResponse {
    fn from(items: Vec<HistoryItem>) -> Self {
        Self {
            items: items.into_iter().map(HistoryItemResponse::from).collect(),
        }
    }
}

/// Full history, most recent first.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HistoryResponse>> {
    let items = state.rewards.history(&user.user_id).await?;
    Ok(Json(items.into()))
}

#[derive(Deserialize)]
struct ActivityQuery {
    limit: Option<usize>,
}

/// Most recent history items for the dashboard.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivityQuery>,
) -> Result<Json<HistoryResponse>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .min(MAX_ACTIVITY_LIMIT);

    let items = state.rewards.recent_activity(&user.user_id, limit).await?;
    Ok(Json(items.into()))
}
