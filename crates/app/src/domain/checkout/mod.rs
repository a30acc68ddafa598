//! Checkout
//!
//! Prices cart lines through the catalog and settles them against an optional coupon code.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CheckoutError;
pub use service::*;
