//! Carts
//!
//! Cart reconciliation keeps a shopper's local cart, their cart item records and their
//! current order in step. Every mutation is written durably first and only then projected
//! onto the caller's [`CartHandle`].

pub mod errors;
mod lines;
pub mod models;
mod records;
mod repositories;
pub mod service;
pub mod state;

pub use errors::CartsServiceError;
pub use service::*;
pub use state::{CartHandle, CartState, SyncStatus};
