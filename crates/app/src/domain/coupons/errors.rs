//! Coupons service errors.

use thiserror::Error;

use crate::documents::StoreError;

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("coupon already exists")]
    AlreadyExists,

    #[error("coupon not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for CouponsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::AlreadyExists(_) => Self::AlreadyExists,
            StoreError::Encode(_) | StoreError::Decode { .. } => Self::InvalidData,
            StoreError::Conflict { .. } | StoreError::Unavailable(_) => Self::Storage(error),
        }
    }
}
