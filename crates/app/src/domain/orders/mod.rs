//! Orders
//!
//! An order is the durable aggregate behind a cart. A user has at most one current order; it
//! stops being current the moment it is submitted, paid, fulfilled or delivered, and those
//! lifecycle flags only ever move from false to true.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
