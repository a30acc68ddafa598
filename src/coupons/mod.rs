//! Coupons
//!
//! Coupon codes are discount rules maintained by store administration. A coupon takes either a
//! percentage off the purchase subtotal or a flat amount, may be switched off manually, and may
//! carry an expiry date and a minimum purchase floor. Both optional rules carry their own
//! `is_set` flag so a stored date or value is only honoured when the rule is switched on.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

mod evaluation;
mod summary;

pub use evaluation::{
    CouponVerdict, compute_discount, explain_invalidity, is_valid, meets_minimum_purchase,
};
pub use summary::CouponSummary;

/// A discount rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponCode {
    /// Document identifier
    #[serde(default)]
    pub id: String,

    /// Code the shopper types at checkout
    pub code: String,

    /// Free-form administrator note
    #[serde(default)]
    pub comment: String,

    /// Discount magnitude, a percentage or a flat amount depending on `is_percentage`
    pub discount: Decimal,

    /// Interpret `discount` as a percentage of the subtotal
    pub is_percentage: bool,

    /// Manual enable/disable switch
    pub is_active: bool,

    /// Optional expiry cutoff
    #[serde(default, rename = "expiry_date")]
    pub expiry: Expiry,

    /// Optional minimum purchase floor
    #[serde(default, rename = "min_purchase")]
    pub minimum_purchase: MinimumPurchase,
}

impl CouponCode {
    /// Active percentage coupon with no expiry and no minimum purchase.
    pub fn percentage(code: impl Into<String>, percent: Decimal) -> Self {
        Self::new(code.into(), percent, true)
    }

    /// Active flat-amount coupon with no expiry and no minimum purchase.
    pub fn flat(code: impl Into<String>, amount: Decimal) -> Self {
        Self::new(code.into(), amount, false)
    }

    fn new(code: String, discount: Decimal, is_percentage: bool) -> Self {
        Self {
            id: code.clone(),
            code,
            comment: String::new(),
            discount,
            is_percentage,
            is_active: true,
            expiry: Expiry::never(),
            minimum_purchase: MinimumPurchase::none(),
        }
    }

    /// Returns the coupon with an expiry cutoff switched on.
    #[must_use]
    pub fn expiring_at(mut self, date: Timestamp) -> Self {
        self.expiry = Expiry::at(date);
        self
    }

    /// Returns the coupon with a minimum purchase floor switched on.
    #[must_use]
    pub fn with_minimum_purchase(mut self, value: Decimal) -> Self {
        self.minimum_purchase = MinimumPurchase::of(value);
        self
    }

    /// Returns the coupon with the manual switch turned off.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Expiry rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Expiry {
    /// Whether the cutoff is enforced
    pub is_set: bool,

    /// Cutoff instant; ignored unless `is_set`
    #[serde(default)]
    pub date: Timestamp,
}

impl Expiry {
    /// No expiry.
    pub fn never() -> Self {
        Self::default()
    }

    /// Expires after the given instant.
    pub fn at(date: Timestamp) -> Self {
        Self { is_set: true, date }
    }

    /// The enforced cutoff, if any.
    pub fn cutoff(&self) -> Option<Timestamp> {
        self.is_set.then_some(self.date)
    }

    /// True once `now` is strictly past an enforced cutoff.
    pub fn has_passed(&self, now: Timestamp) -> bool {
        self.cutoff().is_some_and(|cutoff| now > cutoff)
    }
}

/// Minimum purchase rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimumPurchase {
    /// Whether the floor is enforced
    pub is_set: bool,

    /// Floor on the purchase subtotal; ignored unless `is_set`
    #[serde(default)]
    pub value: Decimal,
}

impl MinimumPurchase {
    /// No minimum.
    pub fn none() -> Self {
        Self::default()
    }

    /// Requires a subtotal of at least `value`.
    pub fn of(value: Decimal) -> Self {
        Self {
            is_set: true,
            value,
        }
    }

    /// The enforced floor, if any.
    pub fn floor(&self) -> Option<Decimal> {
        self.is_set.then_some(self.value)
    }

    /// True when no floor is enforced or `subtotal` reaches it.
    pub fn is_met_by(&self, subtotal: Decimal) -> bool {
        self.floor().is_none_or(|floor| subtotal >= floor)
    }
}
