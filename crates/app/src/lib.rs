//! Cart reconciliation, orders, coupons and checkout over a document store.

pub mod config;
pub mod context;
pub mod documents;
pub mod domain;
pub mod identity;
pub mod observability;

#[cfg(test)]
mod test;

mod uuids;
