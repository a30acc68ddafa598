//! Catalog service errors.

use thiserror::Error;

use crate::domain::catalog::models::ProductId;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("product not found: {0}")]
    NotFound(ProductId),
}
