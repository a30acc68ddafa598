//! Checkout Models

use cartwright::{coupons::CouponVerdict, quote::Quote};

use crate::domain::{carts::models::CartItem, catalog::models::ProductId};

/// A product and quantity to price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product: ProductId,
    pub quantity: u32,
}

impl CheckoutLine {
    pub fn new(product: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }
}

impl From<&CartItem> for CheckoutLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.clone(),
            quantity: item.quantity,
        }
    }
}

/// A priced quote with the outcome of the coupon check, when a code was given.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutQuote {
    pub quote: Quote,
    pub verdict: Option<CouponVerdict>,
}
