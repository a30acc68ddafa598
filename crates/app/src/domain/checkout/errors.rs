//! Checkout errors.

use cartwright::quote::QuoteError;
use thiserror::Error;

use crate::domain::{catalog::CatalogServiceError, coupons::CouponsServiceError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),

    #[error(transparent)]
    Coupons(#[from] CouponsServiceError),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}
