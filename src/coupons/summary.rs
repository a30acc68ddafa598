//! Coupon Summary

use std::fmt;

use rusty_money::iso::Currency;

use crate::{coupons::CouponCode, pricing::format_amount};

/// One-line, shopper-facing description of a coupon.
///
/// `SPRING: 15% off (min. purchase $40.00) - Expires 2026-04-30`
#[derive(Debug, Clone, Copy)]
pub struct CouponSummary<'a> {
    coupon: &'a CouponCode,
    currency: &'static Currency,
}

impl<'a> CouponSummary<'a> {
    /// Summarise `coupon`, formatting money in `currency`.
    pub fn new(coupon: &'a CouponCode, currency: &'static Currency) -> Self {
        Self { coupon, currency }
    }
}

impl fmt::Display for CouponSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coupon = self.coupon;

        write!(f, "{}: ", coupon.code)?;

        if coupon.is_percentage {
            write!(f, "{}% off", coupon.discount.normalize())?;
        } else {
            write!(f, "{} off", format_amount(coupon.discount, self.currency))?;
        }

        if let Some(minimum) = coupon.minimum_purchase.floor() {
            write!(
                f,
                " (min. purchase {})",
                format_amount(minimum, self.currency)
            )?;
        }

        if let Some(cutoff) = coupon.expiry.cutoff() {
            write!(f, " - Expires {}", cutoff.strftime("%Y-%m-%d"))?;
        }

        Ok(())
    }
}
