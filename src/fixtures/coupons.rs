//! Coupon Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::coupons::CouponCode;

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of document id -> coupon
    pub coupons: FxHashMap<String, CouponCode>,
}
