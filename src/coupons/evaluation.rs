//! Coupon Evaluation

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

use crate::{
    coupons::CouponCode,
    pricing::{DEFAULT_CURRENCY, format_amount},
};

/// A coupon is valid when it is switched on and not past an enforced expiry.
pub fn is_valid(coupon: &CouponCode, now: Timestamp) -> bool {
    coupon.is_active && !coupon.expiry.has_passed(now)
}

/// A subtotal meets the minimum purchase when no floor is set or it reaches the floor.
pub fn meets_minimum_purchase(coupon: &CouponCode, subtotal: Decimal) -> bool {
    coupon.minimum_purchase.is_met_by(subtotal)
}

/// Discount a coupon grants on `subtotal` at `now`.
///
/// Zero when the coupon is invalid or the subtotal is below its minimum purchase. Otherwise
/// `subtotal * discount / 100` for percentage coupons and the flat `discount` for the rest.
/// The result is never negative and is not capped at the subtotal; a flat coupon can exceed
/// a small purchase and checkout decides how to settle that.
pub fn compute_discount(coupon: &CouponCode, subtotal: Decimal, now: Timestamp) -> Decimal {
    if !is_valid(coupon, now) || !meets_minimum_purchase(coupon, subtotal) {
        return Decimal::ZERO;
    }

    let discount = if coupon.is_percentage {
        percent_of(subtotal, coupon.discount)
    } else {
        coupon.discount
    };

    discount.max(Decimal::ZERO)
}

/// `amount * percent / 100`, with amounts beyond the `Decimal` range granting nothing.
fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount
        .checked_mul(percent)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Outcome of checking a coupon, in check precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponVerdict {
    /// No coupon matched the code.
    NotFound,

    /// The coupon is switched off.
    Inactive,

    /// The coupon's expiry has passed.
    Expired {
        /// Enforced cutoff
        expired_at: Timestamp,
    },

    /// The subtotal is below the coupon's minimum purchase.
    BelowMinimum {
        /// Enforced floor
        minimum: Decimal,
    },

    /// The coupon applies.
    Valid,
}

impl CouponVerdict {
    /// Whether the coupon applies.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Human-readable reason, formatting money in `currency`.
    pub fn describe(&self, currency: &Currency) -> String {
        match self {
            Self::NotFound => "Coupon code not found".to_string(),
            Self::Inactive => "This coupon code is not active".to_string(),
            Self::Expired { .. } => "This coupon code has expired".to_string(),
            Self::BelowMinimum { minimum } => format!(
                "Minimum purchase of {} required",
                format_amount(*minimum, currency)
            ),
            Self::Valid => "Coupon is valid".to_string(),
        }
    }
}

impl fmt::Display for CouponVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(DEFAULT_CURRENCY))
    }
}

/// Explains why a coupon does or does not apply.
///
/// Checks run in a fixed order and the first failure wins: missing coupon, inactive,
/// expired, below minimum purchase. The minimum purchase is only checked when a subtotal is
/// supplied.
pub fn explain_invalidity(
    coupon: Option<&CouponCode>,
    subtotal: Option<Decimal>,
    now: Timestamp,
) -> CouponVerdict {
    let Some(coupon) = coupon else {
        return CouponVerdict::NotFound;
    };

    if !coupon.is_active {
        return CouponVerdict::Inactive;
    }

    if let Some(expired_at) = coupon.expiry.cutoff().filter(|cutoff| now > *cutoff) {
        return CouponVerdict::Expired { expired_at };
    }

    if let (Some(subtotal), Some(minimum)) = (subtotal, coupon.minimum_purchase.floor())
        && subtotal < minimum
    {
        return CouponVerdict::BelowMinimum { minimum };
    }

    CouponVerdict::Valid
}
