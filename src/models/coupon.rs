// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static coupon catalog.

use crate::error::{AppError, Result};
use serde::Serialize;

/// A redeemable coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coupon {
    pub id: String,
    pub name: String,
    pub points_cost: u64,
}

impl Coupon {
    pub fn new(id: impl Into<String>, name: impl Into<String>, points_cost: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points_cost,
        }
    }
}

/// Built-in partner coupons: (id, name, cost).
const DEFAULT_COUPONS: &[(&str, &str, u64)] = &[
    ("coupon1", "10% Off at Green Mart", 100),
    ("coupon2", "Free Coffee at EcoCafe", 50),
    ("coupon3", "20% Off Recycled Clothing", 200),
    ("coupon4", "Free Plant Seedling", 75),
    ("coupon5", "15% Off Solar Gadgets", 150),
    ("coupon6", "Free Eco-Bag", 30),
    ("coupon7", "25% Off Organic Food", 180),
    ("coupon8", "Free Bike Tune-up", 120),
    ("coupon9", "30% Off Green Energy", 300),
    ("coupon10", "Free Composting Kit", 90),
];

/// Fixed list of coupons, loaded once at startup.
#[derive(Debug, Clone)]
pub struct CouponCatalog {
    coupons: Vec<Coupon>,
}

impl Default for CouponCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_COUPONS
                .iter()
                .map(|&(id, name, cost)| Coupon::new(id, name, cost))
                .collect(),
        )
    }
}

impl CouponCatalog {
    /// Build a catalog. Coupons with a zero cost are dropped.
    pub fn new(coupons: Vec<Coupon>) -> Self {
        let coupons = coupons
            .into_iter()
            .filter(|c| {
                if c.points_cost == 0 {
                    tracing::warn!(coupon_id = %c.id, "Skipping coupon with zero cost");
                    false
                } else {
                    true
                }
            })
            .collect();
        Self { coupons }
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Look up a coupon by ID.
    pub fn find(&self, coupon_id: &str) -> Result<&Coupon> {
        self.coupons
            .iter()
            .find(|c| c.id == coupon_id)
            .ok_or_else(|| AppError::CouponNotFound(coupon_id.to_string()))
    }
}
