//! Cartwright
//!
//! Cartwright is the pricing core of a storefront: coupon evaluation, cart subtotals and
//! checkout quotes. Everything in this crate is pure and synchronous; persistence and cart
//! reconciliation live in `cartwright-app`.

pub mod coupons;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod quote;
