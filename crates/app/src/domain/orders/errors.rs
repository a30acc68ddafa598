//! Orders service errors.

use thiserror::Error;

use crate::documents::StoreError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("order was changed elsewhere")]
    Conflict,

    #[error("order is no longer open")]
    Closed,

    #[error("no current order")]
    NoCurrentOrder,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for OrdersServiceError {
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
