//! Coupon Models

use cartwright::coupons::{CouponCode, CouponVerdict};
use rust_decimal::Decimal;

/// Result of checking a shopper's code against the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponEvaluation {
    /// The coupon the code matched, if any
    pub coupon: Option<CouponCode>,

    /// Why the coupon does or does not apply
    pub verdict: CouponVerdict,

    /// Discount granted on the evaluated subtotal
    pub discount: Decimal,
}

impl CouponEvaluation {
    /// The matched coupon, only when it applies.
    pub fn applicable(&self) -> Option<&CouponCode> {
        self.coupon.as_ref().filter(|_| self.verdict.is_valid())
    }
}
