//! Coupons
//!
//! Administration of the coupon catalogue stored under `coupon_codes`, and evaluation of a
//! shopper's code against it.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CouponsServiceError;
pub use service::*;
