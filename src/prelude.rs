//! Cartwright prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    coupons::{
        CouponCode, CouponSummary, CouponVerdict, Expiry, MinimumPurchase, compute_discount,
        explain_invalidity, is_valid, meets_minimum_purchase,
    },
    fixtures::{Fixture, FixtureError, FixtureProduct},
    pricing::{PricedLine, PricingError, format_amount, subtotal},
    quote::{Quote, QuoteError},
};
