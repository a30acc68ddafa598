//! Carts service errors.

use thiserror::Error;

use crate::{documents::StoreError, domain::orders::OrdersServiceError};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("Quantity must be at least 1")]
    InvalidQuantity(u32),

    #[error("cart item already exists")]
    AlreadyExists,

    #[error("cart item not found")]
    NotFound,

    #[error("cart was changed elsewhere")]
    Conflict,

    #[error("no current order")]
    NoCurrentOrder,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for CartsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::AlreadyExists(_) => Self::AlreadyExists,
            StoreError::Conflict { .. } => Self::Conflict,
            StoreError::Encode(_) | StoreError::Decode { .. } => Self::InvalidData,
            StoreError::Unavailable(_) => Self::Storage(error),
        }
    }
}

impl From<OrdersServiceError> for CartsServiceError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::NotFound => Self::NotFound,
            OrdersServiceError::AlreadyExists => Self::AlreadyExists,
            OrdersServiceError::Conflict | OrdersServiceError::Closed => Self::Conflict,
            OrdersServiceError::NoCurrentOrder => Self::NoCurrentOrder,
            OrdersServiceError::InvalidData => Self::InvalidData,
            OrdersServiceError::Storage(source) => Self::Storage(source),
        }
    }
}
